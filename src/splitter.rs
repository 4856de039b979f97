use crate::types::MatchResult;

/// Host split into its three parts
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DomainParts {
    pub subdomain: Option<String>,
    pub hostname: Option<String>,
    pub suffix: Option<String>,
}

/// Split `labels` around the suffix length found by the matcher.
///
/// With no suffix the last label becomes the hostname. When the suffix
/// spans the whole host, every part is absent.
pub fn split<S: AsRef<str>>(labels: &[S], matched: &MatchResult) -> DomainParts {
    let n = labels.len();
    let k = matched.labels;

    if n == 0 {
        return DomainParts::default();
    }

    if k == 0 {
        return DomainParts {
            subdomain: join(&labels[..n - 1]),
            hostname: Some(labels[n - 1].as_ref().to_string()),
            suffix: None,
        };
    }

    if n <= k {
        return DomainParts::default();
    }

    DomainParts {
        subdomain: join(&labels[..n - k - 1]),
        hostname: Some(labels[n - k - 1].as_ref().to_string()),
        suffix: join(&labels[n - k..]),
    }
}

fn join<S: AsRef<str>>(labels: &[S]) -> Option<String> {
    if labels.is_empty() {
        return None;
    }
    Some(
        labels
            .iter()
            .map(AsRef::as_ref)
            .collect::<Vec<&str>>()
            .join("."),
    )
}
