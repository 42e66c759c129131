//! Access address derivation.

use crate::merge::FinalAttachment;
use serde::{Deserialize, Serialize};

/// The addresses an instance is best reached on.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessAddresses {
    pub v4: String,
    pub v6: String,
}

impl AccessAddresses {
    /// Pick access addresses from the attachments.
    ///
    /// The first non-empty address wins, except that an attachment flagged as
    /// the access network always replaces what was picked before it.
    pub fn derive(attachments: &[FinalAttachment]) -> Self {
        let mut access = Self::default();
        for attachment in attachments {
            if !attachment.fixed_ip_v4.is_empty() && (access.v4.is_empty() || attachment.access_network) {
                access.v4 = attachment.fixed_ip_v4.clone();
            }
            if !attachment.fixed_ip_v6.is_empty() && (access.v6.is_empty() || attachment.access_network) {
                access.v6 = attachment.fixed_ip_v6.clone();
            }
        }
        access
    }

    /// Fall back to the `accessIPv4`/`accessIPv6` the server itself declares.
    #[must_use]
    pub fn or_server_declared(mut self, access_ipv4: Option<&str>, access_ipv6: Option<&str>) -> Self {
        if self.v4.is_empty() {
            self.v4 = access_ipv4.unwrap_or_default().to_string();
        }
        if self.v6.is_empty() {
            self.v6 = access_ipv6.unwrap_or_default().to_string();
        }
        self
    }

    /// Host to connect to: IPv4 when known, else IPv6.
    pub fn preferred_host(&self) -> Option<&str> {
        [self.v4.as_str(), self.v6.as_str()].into_iter().find(|a| !a.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attachment(v4: &str, v6: &str, access_network: bool) -> FinalAttachment {
        FinalAttachment {
            fixed_ip_v4: v4.to_string(),
            fixed_ip_v6: v6.to_string(),
            access_network,
            ..FinalAttachment::default()
        }
    }

    #[test]
    fn test_flagged_attachment_wins_from_the_middle() {
        let access = AccessAddresses::derive(&[
            attachment("10.0.0.1", "", false),
            attachment("10.0.0.2", "", true),
            attachment("10.0.0.3", "", false),
        ]);
        assert_eq!(access.v4, "10.0.0.2");
        assert_eq!(access.v6, "");
    }

    #[test]
    fn test_first_non_empty_wins_without_flags() {
        let access = AccessAddresses::derive(&[
            attachment("", "fd00::1", false),
            attachment("10.0.0.2", "fd00::2", false),
        ]);
        assert_eq!(access.v4, "10.0.0.2");
        assert_eq!(access.v6, "fd00::1");
    }

    #[test]
    fn test_flag_does_not_clear_with_empty_address() {
        let access = AccessAddresses::derive(&[
            attachment("10.0.0.1", "fd00::1", false),
            attachment("", "fd00::2", true),
        ]);
        assert_eq!(access.v4, "10.0.0.1");
        assert_eq!(access.v6, "fd00::2");
    }

    #[test]
    fn test_server_declared_fallback_only_fills_gaps() {
        let access = AccessAddresses::derive(&[attachment("10.0.0.1", "", false)])
            .or_server_declared(Some("198.51.100.1"), Some("2001:db8::1"));
        assert_eq!(access.v4, "10.0.0.1");
        assert_eq!(access.v6, "2001:db8::1");
    }

    #[test]
    fn test_preferred_host() {
        let v6_only = AccessAddresses {
            v4: String::new(),
            v6: "fd00::1".to_string(),
        };
        assert_eq!(v6_only.preferred_host(), Some("fd00::1"));
        assert_eq!(AccessAddresses::default().preferred_host(), None);
    }
}
