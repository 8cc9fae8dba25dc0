use crate::config::oauth::OAuthSettings;
use crate::models::user::UserRole;

const ANY_DOMAIN: &str = "*";

/// Email domains allowed to sign in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainAllowlist {
    Any,
    Domains(Vec<String>),
}

impl DomainAllowlist {
    /// Parses a comma separated list of domains; `*` anywhere allows every domain.
    pub fn parse(raw: &str) -> Self {
        let domains: Vec<String> = raw
            .split(',')
            .map(|domain| domain.trim().trim_start_matches('@').to_lowercase())
            .filter(|domain| !domain.is_empty())
            .collect();

        if domains.iter().any(|domain| domain == ANY_DOMAIN) {
            DomainAllowlist::Any
        } else {
            DomainAllowlist::Domains(domains)
        }
    }

    pub fn allows(&self, domain: &str) -> bool {
        match self {
            DomainAllowlist::Any => true,
            DomainAllowlist::Domains(domains) => {
                let domain = domain.trim().to_lowercase();
                domains.iter().any(|allowed| *allowed == domain)
            }
        }
    }
}

/// Who may sign in and who gets admin rights.
#[derive(Debug, Clone)]
pub struct AccessPolicy {
    pub allowlist: DomainAllowlist,
    admin_emails: Vec<String>,
}

impl AccessPolicy {
    pub fn new(allowlist: DomainAllowlist, admin_emails: Vec<String>) -> Self {
        Self {
            allowlist,
            admin_emails: admin_emails.into_iter().map(|email| email.trim().to_lowercase()).collect(),
        }
    }

    pub fn from_settings(settings: &OAuthSettings) -> Self {
        Self::new(
            DomainAllowlist::parse(&settings.allowed_domains),
            settings.admin_emails.clone(),
        )
    }

    pub fn role_for(&self, email: &str) -> UserRole {
        let email = email.trim().to_lowercase();
        if self.admin_emails.contains(&email) {
            UserRole::Admin
        } else {
            UserRole::User
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wildcard_allows_any_domain() {
        let allowlist = DomainAllowlist::parse("*");
        assert_eq!(allowlist, DomainAllowlist::Any);
        assert!(allowlist.allows("gmail.com"));
    }

    #[test]
    fn comma_separated_list_is_trimmed_and_case_insensitive() {
        let allowlist = DomainAllowlist::parse(" cloudreach.com, Cloudreach.co.uk ,");
        assert!(allowlist.allows("cloudreach.com"));
        assert!(allowlist.allows("CLOUDREACH.CO.UK"));
        assert!(!allowlist.allows("gmail.com"));
        assert!(!allowlist.allows("evilcloudreach.com"));
    }

    #[test]
    fn empty_list_allows_nobody() {
        let allowlist = DomainAllowlist::parse("");
        assert!(!allowlist.allows("cloudreach.com"));
    }

    #[test]
    fn admin_role_comes_from_configured_emails() {
        let policy = AccessPolicy::new(DomainAllowlist::Any, vec!["Boss@Example.com".to_string()]);
        assert_eq!(policy.role_for("boss@example.com"), UserRole::Admin);
        assert_eq!(policy.role_for("someone@example.com"), UserRole::User);
    }
}
