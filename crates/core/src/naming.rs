//! Asset name generation.
//!
//! Patterns use bracketed placeholders that are filled from the asset's
//! content and the resource it came from:
//!
//! - `[hash]`, `[contenthash]`: SHA-256 of the content, in hex
//! - `[hash:N]`, `[contenthash:N]`: the same, truncated to `N` characters
//! - `[name]`, `[ext]`: file stem and extension of the resource
//! - `[path]`: directory of the resource relative to the naming context
//!
//! Unknown placeholders are left as they are.

use std::path::{Component, Path};

use sha2::{Digest, Sha256};

use crate::{config::NAME_HASH_LENGTH, model::TargetCombination};

/// Inputs for [`interpolate_name`].
#[derive(Debug, Clone, Copy)]
pub struct NameContext<'a> {
    /// Directory that `[path]` is made relative to.
    pub context: &'a Path,
    /// The resource being processed (the manifest).
    pub resource_path: &'a Path,
    pub content: &'a [u8],
    /// Carried for hosts that substitute capture groups; not interpreted here.
    pub reg_exp: Option<&'a str>,
}

/// Lowercase words of `value` joined with `-`.
///
/// Words split on anything that is not a letter or digit and on
/// lower-to-upper case transitions, so `"OpenSans Bold"` becomes
/// `"open-sans-bold"`.
pub fn kebab_case(value: &str) -> String {
    let chars: Vec<char> = value.chars().collect();
    let mut words: Vec<String> = Vec::new();
    let mut current = String::new();

    for (i, &c) in chars.iter().enumerate() {
        if !c.is_alphanumeric() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            continue;
        }
        if let Some(&prev) = i.checked_sub(1).and_then(|p| chars.get(p)) {
            let next = chars.get(i + 1).copied();
            let camel = prev.is_lowercase() && c.is_uppercase();
            let acronym_end = prev.is_uppercase()
                && c.is_uppercase()
                && next.is_some_and(char::is_lowercase);
            if (camel || acronym_end) && !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
        }
        current.extend(c.to_lowercase());
    }
    if !current.is_empty() {
        words.push(current);
    }
    words.join("-")
}

/// The name pattern for a converted font of `family`.
pub fn asset_pattern(family: &str, target: &TargetCombination) -> String {
    format!(
        "{}-{}-{}-{}.[hash:{NAME_HASH_LENGTH}]{}",
        kebab_case(family),
        target.style,
        target.weight,
        target.stretch,
        target.format.extension()
    )
}

/// Fill the placeholders of `pattern`.
pub fn interpolate_name(pattern: &str, ctx: &NameContext<'_>) -> String {
    let mut out = String::with_capacity(pattern.len());
    let mut hash: Option<String> = None;
    let mut rest = pattern;

    while let Some(start) = rest.find('[') {
        out.push_str(&rest[..start]);
        let tail = &rest[start..];
        let Some(end) = tail.find(']') else {
            out.push_str(tail);
            return out;
        };
        let token = &tail[1..end];
        match expand_token(token, ctx, &mut hash) {
            Some(value) => out.push_str(&value),
            None => out.push_str(&tail[..=end]),
        }
        rest = &tail[end + 1..];
    }
    out.push_str(rest);
    out
}

fn expand_token(token: &str, ctx: &NameContext<'_>, hash: &mut Option<String>) -> Option<String> {
    let (kind, length) = match token.split_once(':') {
        Some((kind, length)) => (kind, Some(length.parse::<usize>().ok()?)),
        None => (token, None),
    };
    match (kind, length) {
        ("hash" | "contenthash", length) => {
            let digest = hash.get_or_insert_with(|| content_hash(ctx.content));
            let length = length.unwrap_or(digest.len()).min(digest.len());
            Some(digest[..length].to_string())
        }
        ("name", None) => Some(
            ctx.resource_path
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_default(),
        ),
        ("ext", None) => Some(
            ctx.resource_path
                .extension()
                .map(|ext| ext.to_string_lossy().into_owned())
                .unwrap_or_default(),
        ),
        ("path", None) => Some(relative_dir(ctx.context, ctx.resource_path)),
        _ => None,
    }
}

/// Hex SHA-256 of `data`.
pub fn content_hash(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    format!("{:x}", hasher.finalize())
}

/// The resource's directory relative to `context`, with a trailing `/`.
fn relative_dir(context: &Path, resource_path: &Path) -> String {
    let Some(dir) = resource_path.parent() else {
        return String::new();
    };
    let relative = dir.strip_prefix(context).unwrap_or(dir);
    let parts: Vec<String> = relative
        .components()
        .filter_map(|component| match component {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            Component::ParentDir => Some("_".to_string()),
            _ => None,
        })
        .collect();
    if parts.is_empty() {
        String::new()
    } else {
        format!("{}/", parts.join("/"))
    }
}
