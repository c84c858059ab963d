const JIRA_HOST_MARKERS: [&str; 3] = ["atlassian.net", "jira.", ".jira."];

/// Decides whether a hostname belongs to a JIRA deployment.
///
/// Matching is a case-sensitive substring test.
pub fn is_jira_page(hostname: Option<&str>) -> bool {
    match hostname {
        Some(host) if !host.is_empty() => {
            JIRA_HOST_MARKERS.iter().any(|marker| host.contains(marker))
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_known_hosts() {
        assert!(is_jira_page(Some("foo.atlassian.net")));
        assert!(is_jira_page(Some("team.sub.jira.com")));
        assert!(is_jira_page(Some("jira.example.org")));
    }

    #[test]
    fn rejects_other_hosts() {
        assert!(!is_jira_page(Some("example.com")));
        assert!(!is_jira_page(Some("")));
        assert!(!is_jira_page(None));
    }

    #[test]
    fn does_not_fold_case() {
        assert!(!is_jira_page(Some("FOO.ATLASSIAN.NET")));
    }
}
