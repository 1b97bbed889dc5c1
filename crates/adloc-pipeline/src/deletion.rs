//! Two-phase deletion state.

use adloc_models::CampaignId;
use serde::Serialize;

/// Confirmation dialog for an irreversible delete.
///
/// Armed by a delete intent; only a confirm issues the remote call. A failed
/// confirm keeps the dialog armed with `error` set so the user can retry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletionDialog {
    pub campaign_id: CampaignId,
    pub in_flight: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl DeletionDialog {
    pub fn armed(campaign_id: CampaignId) -> Self {
        Self {
            campaign_id,
            in_flight: false,
            error: None,
        }
    }

    pub(crate) fn start(&mut self) {
        self.in_flight = true;
        self.error = None;
    }

    pub(crate) fn fail(&mut self, message: String) {
        self.in_flight = false;
        self.error = Some(message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failed_attempt_stays_armed() {
        let mut dialog = DeletionDialog::armed(CampaignId::from("c1"));
        dialog.start();
        assert!(dialog.in_flight);

        dialog.fail("Request failed (500)".to_string());
        assert!(!dialog.in_flight);
        assert_eq!(dialog.error.as_deref(), Some("Request failed (500)"));

        dialog.start();
        assert!(dialog.error.is_none());
    }
}
