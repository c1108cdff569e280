//! Version templates.
//!
//! A template is literal text with `{{ ... }}` actions. The only value an
//! action can name is `ProjectVersion`, optionally followed by one of the
//! accessors `.Major`, `.Minor` or `.Patch`:
//!
//! ```text
//! {{ProjectVersion}}              -> 1.2.3-4-gabcdef
//! {{ProjectVersion.Major}}.x.x    -> 1.x.x
//! ```
//!
//! The accessors require the version to start with `<major>.<minor>.<patch>`.
//! The project version is only looked up when an action references it.
//!
//! This is the subset of Go template syntax that version fields use. The
//! `{{- ` and ` -}}` markers trim whitespace around an action as they do in
//! Go. Pipelines, variables and control actions are rejected.

use std::sync::LazyLock;

use regex::Regex;

use crate::errors::TemplateError;
use crate::version::VersionProvider;

const OPEN: &str = "{{";
const CLOSE: &str = "}}";
const PROJECT_VERSION: &str = "ProjectVersion";

/// Leading `major.minor.patch` of an orderable version. No trailing `$` so
/// snapshot and release-candidate versions still match.
static ORDERABLE_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([0-9]+)\.([0-9]+)\.([0-9]+)").expect("orderable version regex should compile")
});

/// Render `template` against the version supplied by `versions`.
///
/// # Errors
///
/// Returns [`TemplateError`] if an action is malformed, names an unknown
/// function or accessor, or if the version cannot be determined or split
/// into components.
pub fn render_version_template(
    template: &str,
    versions: &dyn VersionProvider,
) -> Result<String, TemplateError> {
    let mut rendered = String::with_capacity(template.len());
    let mut version: Option<String> = None;
    let mut rest = template;
    let mut consumed = 0usize;

    while let Some(start) = rest.find(OPEN) {
        rendered.push_str(&rest[..start]);
        let action_offset = consumed + start;
        let after_open = &rest[start + OPEN.len()..];
        let Some(end) = after_open.find(CLOSE) else {
            return Err(TemplateError::Unclosed {
                offset: action_offset,
            });
        };

        let (action, trim_before, trim_after) = trim_markers(&after_open[..end]);
        if trim_before {
            rendered.truncate(rendered.trim_end_matches(is_space).len());
        }
        let action = action.trim();
        if action.is_empty() {
            return Err(TemplateError::EmptyAction {
                offset: action_offset,
            });
        }
        rendered.push_str(&evaluate(action, versions, &mut version)?);

        let mut advance = start + OPEN.len() + end + CLOSE.len();
        if trim_after {
            advance = rest.len() - rest[advance..].trim_start_matches(is_space).len();
        }
        consumed += advance;
        rest = &rest[advance..];
    }
    rendered.push_str(rest);

    Ok(rendered)
}

/// Split `{{- ` and ` -}}` off an action body. A dash only trims when
/// whitespace separates it from the action.
fn trim_markers(body: &str) -> (&str, bool, bool) {
    let (body, before) = match body.strip_prefix('-') {
        Some(inner) if inner.starts_with(is_space) => (inner, true),
        _ => (body, false),
    };
    let (body, after) = match body.strip_suffix('-') {
        Some(inner) if inner.ends_with(is_space) => (inner, true),
        _ => (body, false),
    };
    (body, before, after)
}

const fn is_space(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\r' | '\n')
}

fn evaluate(
    action: &str,
    versions: &dyn VersionProvider,
    cached: &mut Option<String>,
) -> Result<String, TemplateError> {
    let (name, accessor) = match action.split_once('.') {
        Some((name, accessor)) => (name, Some(accessor)),
        None => (action, None),
    };
    if name != PROJECT_VERSION {
        return Err(TemplateError::UnknownFunction {
            name: name.to_string(),
        });
    }

    let version = match cached {
        Some(version) => version.clone(),
        None => {
            let version = versions
                .project_version()
                .map_err(|error| TemplateError::Version(format!("{error:#}")))?;
            *cached = Some(version.clone());
            version
        }
    };

    let Some(accessor) = accessor else {
        return Ok(version);
    };
    let index = match accessor {
        "Major" => 1,
        "Minor" => 2,
        "Patch" => 3,
        other => {
            return Err(TemplateError::UnknownAccessor {
                accessor: other.to_string(),
            });
        }
    };

    ORDERABLE_PREFIX
        .captures(&version)
        .and_then(|captures| captures.get(index))
        .map(|part| part.as_str().to_string())
        .ok_or_else(|| TemplateError::NotOrderable {
            accessor: accessor.to_string(),
            version: version.clone(),
        })
}
