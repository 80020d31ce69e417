use serde::{Deserialize, Serialize};

use crate::types::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuthMethod {
    #[serde(rename = "5G_AKA")]
    FiveGAka,
    #[serde(rename = "EAP_AKA_PRIME")]
    EapAkaPrime,
}

/// Where the sequence number was read from, so the advanced value is
/// written back to the same place.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SqnLocation {
    Flat,
    Legacy,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperatorKey {
    Opc(String),
    Op(String),
}

/// Subscriber record as provisioned in the store. Credential fields appear
/// either flat on the record or nested under the legacy
/// `authenticationSubscription` sub-document; both shapes are normalized by
/// `credential()` before anything downstream sees them.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriberDocument {
    #[serde(rename = "_id")]
    pub ue_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permanent_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opc: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub op: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sequence_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authentication_management_field: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authentication_method: Option<AuthMethod>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authentication_subscription: Option<LegacyAuthenticationSubscription>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider_metadata: Option<ProviderMetadata>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyAuthenticationSubscription {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authentication_method: Option<AuthMethod>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enc_permanent_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enc_opc_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enc_op_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sequence_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authentication_management_field: Option<String>,
}

/// Provisioning-side metadata some records carry. Only the named
/// sub-fields are consumed; unknown siblings are dropped at the boundary.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provisioned_at: Option<String>,
}

/// Canonical in-memory credential every downstream component depends on.
#[derive(Clone, Debug)]
pub struct SubscriberCredential {
    pub supi: String,
    pub permanent_key: String,
    pub operator_key: Option<OperatorKey>,
    pub sqn_hex: String,
    pub amf_hex: String,
    pub auth_method: AuthMethod,
    pub sqn_location: SqnLocation,
}

impl SubscriberDocument {
    /// Normalizes either storage shape into the canonical credential.
    /// Flat fields win over the legacy sub-document when both are present.
    pub fn credential(&self, default_amf: &str) -> SubscriberCredential {
        let legacy = self.authentication_subscription.as_ref();

        let permanent_key = self
            .permanent_key
            .clone()
            .or_else(|| legacy.and_then(|l| l.enc_permanent_key.clone()))
            .unwrap_or_default();

        let operator_key = self
            .opc
            .clone()
            .map(OperatorKey::Opc)
            .or_else(|| self.op.clone().map(OperatorKey::Op))
            .or_else(|| legacy.and_then(|l| l.enc_opc_key.clone()).map(OperatorKey::Opc))
            .or_else(|| legacy.and_then(|l| l.enc_op_key.clone()).map(OperatorKey::Op));

        let (sqn_hex, sqn_location) = match &self.sequence_number {
            Some(sqn) => (sqn.clone(), SqnLocation::Flat),
            None => (
                legacy
                    .and_then(|l| l.sequence_number.clone())
                    .unwrap_or_default(),
                SqnLocation::Legacy,
            ),
        };

        let amf_hex = self
            .authentication_management_field
            .clone()
            .or_else(|| legacy.and_then(|l| l.authentication_management_field.clone()))
            .unwrap_or_else(|| default_amf.to_string());

        let auth_method = self
            .authentication_method
            .or_else(|| legacy.and_then(|l| l.authentication_method))
            .unwrap_or(AuthMethod::FiveGAka);

        SubscriberCredential {
            supi: self.ue_id.clone(),
            permanent_key,
            operator_key,
            sqn_hex,
            amf_hex,
            auth_method,
            sqn_location,
        }
    }
}

impl SubscriberCredential {
    /// K, operator key and SQN must all be present and non-empty before any
    /// derivation. A record failing this holds corrupted provisioning data.
    pub fn ensure_complete(&self) -> Result<(), AppError> {
        if self.permanent_key.is_empty() {
            return Err(AppError::MissingCredentials(format!(
                "Subscriber {} has no permanent key",
                self.supi
            )));
        }
        let operator_key_present = matches!(
            &self.operator_key,
            Some(OperatorKey::Opc(value)) | Some(OperatorKey::Op(value)) if !value.is_empty()
        );
        if !operator_key_present {
            return Err(AppError::MissingCredentials(format!(
                "Subscriber {} has no operator key",
                self.supi
            )));
        }
        if self.sqn_hex.is_empty() {
            return Err(AppError::MissingCredentials(format!(
                "Subscriber {} has no sequence number",
                self.supi
            )));
        }
        Ok(())
    }

    pub fn has_usable_credentials(&self) -> bool {
        self.ensure_complete().is_ok()
    }
}
