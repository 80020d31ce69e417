use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::sqn::MAX_REQUESTED_VECTORS;
use crate::types::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuthType {
    #[serde(rename = "5G_AKA")]
    FiveGAka,
    #[serde(rename = "EAP_AKA_PRIME")]
    EapAkaPrime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AvType {
    #[serde(rename = "5G_HE_AKA")]
    FiveGHeAka,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticationInfoRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub serving_network_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ausf_instance_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resynchronization_info: Option<ResynchronizationInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supported_features: Option<String>,
}

impl AuthenticationInfoRequest {
    /// Returns the mandatory serving network name and AUSF instance id, or
    /// names the first field that is absent.
    pub fn validate(&self) -> Result<(&str, &str), AppError> {
        let snn = self
            .serving_network_name
            .as_deref()
            .filter(|s| !s.is_empty())
            .ok_or_else(|| AppError::MissingMandatoryField("servingNetworkName".to_string()))?;
        let ausf_instance_id = self
            .ausf_instance_id
            .as_deref()
            .filter(|s| !s.is_empty())
            .ok_or_else(|| AppError::MissingMandatoryField("ausfInstanceId".to_string()))?;
        Ok((snn, ausf_instance_id))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResynchronizationInfo {
    pub rand: String,
    pub auts: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticationInfoResult {
    pub auth_type: AuthType,
    pub authentication_vector: Av5gHeAka,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supi: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Av5gHeAka {
    pub av_type: AvType,
    pub rand: String,
    pub xres_star: String,
    pub autn: String,
    pub kausf: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RgAuthCtx {
    pub auth_ind: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supi: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HssAuthType {
    EpsAka,
    ImsAka,
    EapAka,
    EapAkaPrime,
    GbaAka,
    UmtsAka,
}

impl HssAuthType {
    pub fn as_str(&self) -> &'static str {
        match self {
            HssAuthType::EpsAka => "EPS_AKA",
            HssAuthType::ImsAka => "IMS_AKA",
            HssAuthType::EapAka => "EAP_AKA",
            HssAuthType::EapAkaPrime => "EAP_AKA_PRIME",
            HssAuthType::GbaAka => "GBA_AKA",
            HssAuthType::UmtsAka => "UMTS_AKA",
        }
    }

    pub fn from_path(value: &str) -> Option<Self> {
        match value {
            "EPS_AKA" => Some(HssAuthType::EpsAka),
            "IMS_AKA" => Some(HssAuthType::ImsAka),
            "EAP_AKA" => Some(HssAuthType::EapAka),
            "EAP_AKA_PRIME" => Some(HssAuthType::EapAkaPrime),
            "GBA_AKA" => Some(HssAuthType::GbaAka),
            "UMTS_AKA" => Some(HssAuthType::UmtsAka),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlmnId {
    pub mcc: String,
    pub mnc: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HssAuthenticationInfoRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hss_auth_type: Option<HssAuthType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_of_requested_vectors: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub serving_network_id: Option<PlmnId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supported_features: Option<String>,
}

impl HssAuthenticationInfoRequest {
    /// Checks the mandatory fields, the URI/body family agreement and the
    /// requested batch size.
    pub fn validate(&self, uri_family: HssAuthType) -> Result<(HssAuthType, u8), AppError> {
        let family = self
            .hss_auth_type
            .ok_or_else(|| AppError::MissingMandatoryField("hssAuthType".to_string()))?;
        if family != uri_family {
            return Err(AppError::InvalidParameter(format!(
                "hssAuthType {} does not match the {} family in the request target",
                family.as_str(),
                uri_family.as_str()
            )));
        }

        let count = self
            .num_of_requested_vectors
            .ok_or_else(|| AppError::MissingMandatoryField("numOfRequestedVectors".to_string()))?;
        if count < 1 || count > MAX_REQUESTED_VECTORS as i64 {
            return Err(AppError::InvalidParameter(format!(
                "numOfRequestedVectors must be between 1 and {}, got {}",
                MAX_REQUESTED_VECTORS, count
            )));
        }

        Ok((family, count as u8))
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HssAuthenticationInfoResult {
    pub hss_authentication_vectors: Vec<HssAuthenticationVector>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supported_features: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(untagged)]
pub enum HssAuthenticationVector {
    EpsAka(AvEpsAka),
    ImsGbaEapAka(AvImsGbaEapAka),
    EapAkaPrime(AvEapAkaPrime),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvEpsAka {
    pub av_type: HssAuthType,
    pub rand: String,
    pub xres: String,
    pub autn: String,
    pub kasme: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvImsGbaEapAka {
    pub av_type: HssAuthType,
    pub rand: String,
    pub xres: String,
    pub autn: String,
    pub ck: String,
    pub ik: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvEapAkaPrime {
    pub av_type: HssAuthType,
    pub rand: String,
    pub xres: String,
    pub autn: String,
    pub ck_prime: String,
    pub ik_prime: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GbaAuthType {
    #[serde(rename = "DIGEST_AKAV1_MD5")]
    DigestAkaV1Md5,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GbaAuthenticationInfoRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auth_type: Option<GbaAuthType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supported_features: Option<String>,
}

impl GbaAuthenticationInfoRequest {
    pub fn validate(&self) -> Result<GbaAuthType, AppError> {
        self.auth_type
            .ok_or_else(|| AppError::MissingMandatoryField("authType".to_string()))
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GbaAuthenticationInfoResult {
    pub three_g_aka_av: ThreeGAkaAv,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supported_features: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThreeGAkaAv {
    pub rand: String,
    pub autn: String,
    pub xres: String,
    pub ck: String,
    pub ik: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthEvent {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nf_instance_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub success: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_stamp: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auth_type: Option<AuthType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub serving_network_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auth_removal_ind: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nf_set_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reset_ids: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_restoration_callback_uri: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub udr_restart_ind: Option<bool>,
}

impl AuthEvent {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.nf_instance_id.is_none() {
            return Err(AppError::MissingMandatoryField("nfInstanceId".to_string()));
        }
        if self.success.is_none() {
            return Err(AppError::MissingMandatoryField("success".to_string()));
        }
        if self.time_stamp.as_deref().map_or(true, str::is_empty) {
            return Err(AppError::MissingMandatoryField("timeStamp".to_string()));
        }
        if self.auth_type.is_none() {
            return Err(AppError::MissingMandatoryField("authType".to_string()));
        }
        if self.serving_network_name.as_deref().map_or(true, str::is_empty) {
            return Err(AppError::MissingMandatoryField("servingNetworkName".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn auth_event() -> AuthEvent {
        AuthEvent {
            nf_instance_id: Some(Uuid::new_v4()),
            success: Some(true),
            time_stamp: Some("2026-08-05T12:00:00Z".to_string()),
            auth_type: Some(AuthType::FiveGAka),
            serving_network_name: Some("5G:mnc001.mcc001.3gppnetwork.org".to_string()),
            auth_removal_ind: None,
            nf_set_id: None,
            reset_ids: None,
            data_restoration_callback_uri: None,
            udr_restart_ind: None,
        }
    }

    #[test]
    fn auth_event_validate_names_first_missing_field() {
        let mut event = auth_event();
        event.nf_instance_id = None;
        assert!(matches!(
            event.validate(),
            Err(AppError::MissingMandatoryField(ref field)) if field == "nfInstanceId"
        ));

        let mut event = auth_event();
        event.time_stamp = Some(String::new());
        assert!(matches!(
            event.validate(),
            Err(AppError::MissingMandatoryField(ref field)) if field == "timeStamp"
        ));

        assert!(auth_event().validate().is_ok());
    }

    #[test]
    fn hss_request_rejects_family_mismatch() {
        let request = HssAuthenticationInfoRequest {
            hss_auth_type: Some(HssAuthType::ImsAka),
            num_of_requested_vectors: Some(1),
            serving_network_id: None,
            supported_features: None,
        };
        assert!(matches!(
            request.validate(HssAuthType::EpsAka),
            Err(AppError::InvalidParameter(_))
        ));
        assert!(request.validate(HssAuthType::ImsAka).is_ok());
    }

    #[test]
    fn hss_request_bounds_vector_count() {
        let mut request = HssAuthenticationInfoRequest {
            hss_auth_type: Some(HssAuthType::UmtsAka),
            num_of_requested_vectors: Some(0),
            serving_network_id: None,
            supported_features: None,
        };
        assert!(matches!(
            request.validate(HssAuthType::UmtsAka),
            Err(AppError::InvalidParameter(_))
        ));

        request.num_of_requested_vectors = Some(33);
        assert!(request.validate(HssAuthType::UmtsAka).is_err());

        request.num_of_requested_vectors = Some(32);
        assert_eq!(request.validate(HssAuthType::UmtsAka).unwrap(), (HssAuthType::UmtsAka, 32));
    }

    #[test]
    fn auth_request_validate_names_missing_fields() {
        let request = AuthenticationInfoRequest {
            serving_network_name: None,
            ausf_instance_id: Some("instance".to_string()),
            resynchronization_info: None,
            supported_features: None,
        };
        assert!(matches!(
            request.validate(),
            Err(AppError::MissingMandatoryField(ref field)) if field == "servingNetworkName"
        ));
    }

    #[test]
    fn hss_auth_type_path_roundtrip() {
        for family in [
            HssAuthType::EpsAka,
            HssAuthType::ImsAka,
            HssAuthType::EapAka,
            HssAuthType::EapAkaPrime,
            HssAuthType::GbaAka,
            HssAuthType::UmtsAka,
        ] {
            assert_eq!(HssAuthType::from_path(family.as_str()), Some(family));
        }
        assert_eq!(HssAuthType::from_path("5G_AKA"), None);
    }

    #[test]
    fn wire_names_follow_3gpp_casing() {
        let av = Av5gHeAka {
            av_type: AvType::FiveGHeAka,
            rand: "00".repeat(16),
            xres_star: "00".repeat(16),
            autn: "00".repeat(16),
            kausf: "00".repeat(32),
        };
        let json = serde_json::to_string(&av).unwrap();
        assert!(json.contains("\"avType\":\"5G_HE_AKA\""));
        assert!(json.contains("\"xresStar\""));
        assert!(json.contains("\"kausf\""));

        let result = GbaAuthenticationInfoResult {
            three_g_aka_av: ThreeGAkaAv {
                rand: String::new(),
                autn: String::new(),
                xres: String::new(),
                ck: String::new(),
                ik: String::new(),
            },
            supported_features: None,
        };
        let json = serde_json::to_string(&result).unwrap();
        assert!(json.contains("\"threeGAkaAv\""));
    }
}
