//! Assistant display-name suffix convention.
//!
//! Persisted assistant names carry a `" - <organization name>"` suffix so an
//! operator browsing the voice platform's own dashboard can tell tenants
//! apart. The suffix is re-derived on every transfer, never stacked.

/// Maximum assistant name length accepted by the voice platform.
pub const MAX_ASSISTANT_NAME_LEN: usize = 40;

/// The ownership suffix for an organization name.
#[must_use]
pub fn org_suffix(org_name: &str) -> String {
    format!(" - {org_name}")
}

/// Append the ownership suffix unless the name already ends with it.
#[must_use]
pub fn with_org_suffix(name: &str, org_name: &str) -> String {
    let suffix = org_suffix(org_name);
    if name.ends_with(&suffix) {
        name.to_string()
    } else {
        format!("{name}{suffix}")
    }
}

/// Recompute a display name for a transfer between organizations.
///
/// Strips the previous owner's suffix if present, clips the remaining base
/// so that `base + new_suffix` fits [`MAX_ASSISTANT_NAME_LEN`], and appends
/// the new suffix. When the new suffix alone reaches the limit the combined
/// name is cut to exactly the limit (the base contributes nothing).
#[must_use]
pub fn rename_for_transfer(name: &str, previous_org: Option<&str>, next_org: &str) -> String {
    let base = match previous_org.map(org_suffix) {
        Some(old_suffix) if name.ends_with(&old_suffix) => {
            name[..name.len() - old_suffix.len()].trim_end()
        }
        _ => name.trim_end(),
    };

    let suffix = org_suffix(next_org);
    let suffix_len = suffix.chars().count();
    if suffix_len >= MAX_ASSISTANT_NAME_LEN {
        return suffix.chars().take(MAX_ASSISTANT_NAME_LEN).collect();
    }

    let budget = MAX_ASSISTANT_NAME_LEN - suffix_len;
    let clipped: String = base.chars().take(budget).collect();
    format!("{}{suffix}", clipped.trim_end())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn suffix_appended_once() {
        assert_eq!(with_org_suffix("Support Bot", "Acme"), "Support Bot - Acme");
        assert_eq!(with_org_suffix("Support Bot - Acme", "Acme"), "Support Bot - Acme");
    }

    #[test]
    fn transfer_swaps_suffix() {
        let renamed = rename_for_transfer("Support Bot - Acme", Some("Acme"), "Globex");
        assert_eq!(renamed, "Support Bot - Globex");
    }

    #[test]
    fn transfer_without_old_suffix_just_appends() {
        let renamed = rename_for_transfer("Support Bot", Some("Acme"), "Globex");
        assert_eq!(renamed, "Support Bot - Globex");
    }

    #[test]
    fn transfer_clips_base_to_fit_limit() {
        let renamed = rename_for_transfer(
            "An Extremely Verbose Assistant Display Name - Acme",
            Some("Acme"),
            "Globex Industries",
        );
        assert!(renamed.chars().count() <= MAX_ASSISTANT_NAME_LEN);
        assert!(renamed.ends_with(" - Globex Industries"));
    }

    #[test]
    fn oversized_suffix_is_cut_to_limit() {
        let next = "A Very Long Organization Name That Exceeds Limits";
        let renamed = rename_for_transfer("Support Bot - Acme", Some("Acme"), next);
        assert!(renamed.chars().count() <= MAX_ASSISTANT_NAME_LEN);
        assert!(!renamed.contains(" - Acme"));
    }

    #[test]
    fn transfer_handles_multibyte_names() {
        let renamed = rename_for_transfer("日本語アシスタント - 旧組織", Some("旧組織"), "新組織");
        assert!(renamed.chars().count() <= MAX_ASSISTANT_NAME_LEN);
        assert!(renamed.ends_with(" - 新組織"));
    }
}
