use std::borrow::Cow;

use chrono::{DateTime, Local, Utc};

use crate::pr::PullRequest;

/// Longest diff, in characters, included in a rendered context.
pub const MAX_DIFF_CHARS: usize = 2000;

pub const TRUNCATION_MARKER: &str = "\n...[truncated, see original for more]...";

pub const NO_DESCRIPTION: &str = "*No description provided*";

/// Render PR metadata (and optionally its diff) into the tag-delimited text
/// block handed back to the model.
///
/// An empty diff renders the same as no diff at all. Timestamps use the
/// process's local time zone, so output differs between machines.
pub fn format_pr_context(pr: &PullRequest, diff: Option<&str>) -> String {
    let merged = if pr.merged { " (merged)" } else { "" };
    let description = match pr.body.as_deref() {
        Some(body) if !body.is_empty() => body,
        _ => NO_DESCRIPTION,
    };

    let mut output = format!(
        "<title> {title} </title>
<pull_request>{number} - {state}{merged}</pull_request>
<author> {author} </author>
<url> {url} </url>

<branch> `{head}` → `{base}` </branch>
<created> {created} </created>
<updated> {updated} </updated>

<changes> +{additions} -{deletions} across {files} file(s) </changes>

<description>
{description}
</description>",
        title = pr.title,
        number = pr.number,
        state = pr.state,
        author = pr.user.login,
        url = pr.html_url,
        head = pr.head.name,
        base = pr.base.name,
        created = format_timestamp(&pr.created_at),
        updated = format_timestamp(&pr.updated_at),
        additions = pr.additions,
        deletions = pr.deletions,
        files = pr.changed_files,
    );

    if let Some(diff) = diff.filter(|d| !d.is_empty()) {
        output.push_str("\n\n<diff>\n");
        output.push_str(&truncate_diff(diff));
        output.push_str("\n</diff>");
    }

    output
}

/// Keep the first MAX_DIFF_CHARS characters of `diff`, appending the
/// truncation marker if anything was dropped. Never splits a character.
pub fn truncate_diff(diff: &str) -> Cow<'_, str> {
    match diff.char_indices().nth(MAX_DIFF_CHARS) {
        None => Cow::Borrowed(diff),
        Some((cut, _)) => {
            let mut kept = String::with_capacity(cut + TRUNCATION_MARKER.len());
            kept.push_str(&diff[..cut]);
            kept.push_str(TRUNCATION_MARKER);
            Cow::Owned(kept)
        }
    }
}

/// Local-time rendering, e.g. `1/2/2024, 3:04:05 AM`.
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.with_timezone(&Local)
        .format("%-m/%-d/%Y, %-I:%M:%S %p")
        .to_string()
}
