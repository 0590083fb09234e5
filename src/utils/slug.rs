use rand::{distributions::Alphanumeric, thread_rng, Rng};

/// Random prefix keeping slugs unique even for identically-named interviews.
fn random_prefix(length: usize) -> String {
    thread_rng()
        .sample_iter(&Alphanumeric)
        .take(length)
        .map(char::from)
        .collect::<String>()
        .to_lowercase()
}

fn sanitize(name: &str, max_len: usize) -> String {
    let mut out = String::with_capacity(name.len());
    let mut last_dash = true;
    for ch in name.to_lowercase().chars() {
        if ch.is_ascii_alphanumeric() {
            out.push(ch);
            last_dash = false;
        } else if !last_dash {
            out.push('-');
            last_dash = true;
        }
    }
    let trimmed = out.trim_matches('-');
    trimmed.chars().take(max_len).collect()
}

/// Public sharing slug: `{rand10}-{sanitized-name}`. Immutable once the
/// interview is created.
pub fn interview_slug(name: &str) -> String {
    format!("{}-{}", random_prefix(10), sanitize(name, 40))
}

/// Organization-branded variant: `{rand10}-{org}-{name}`.
pub fn org_interview_slug(name: &str, organization_name: &str) -> String {
    format!(
        "{}-{}-{}",
        random_prefix(10),
        sanitize(organization_name, 40),
        sanitize(name, 40)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitizes_punctuation_and_case() {
        let slug = interview_slug("Senior Rust Engineer (Backend)!");
        let (_, rest) = slug.split_once('-').unwrap();
        assert_eq!(rest, "senior-rust-engineer-backend");
    }

    #[test]
    fn org_variant_includes_both_parts() {
        let slug = org_interview_slug("Backend Loop", "Acme Corp");
        assert!(slug.ends_with("-acme-corp-backend-loop"));
    }

    #[test]
    fn slugs_for_same_name_differ() {
        assert_ne!(interview_slug("x"), interview_slug("x"));
    }
}
