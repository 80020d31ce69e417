use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use std::env;
use uuid::Uuid;

use crate::crypto::{self, vectors, KeyMaterial};
use crate::sqn;
use crate::types::subscriber::SubscriberCredential;
use crate::types::ueau::{
    AuthEvent, AuthType, AuthenticationInfoRequest, AuthenticationInfoResult,
    GbaAuthenticationInfoRequest, GbaAuthenticationInfoResult, HssAuthType,
    HssAuthenticationInfoRequest, HssAuthenticationInfoResult, PlmnId, ResynchronizationInfo,
    RgAuthCtx,
};
use crate::types::{AppError, AppState, StoredAuthEvent, UeIdentity};

/// Nudm-UEAU generate-auth-data: one 5G home-environment AV per call.
pub async fn generate_auth_data(
    State(app_state): State<AppState>,
    Path(ue_id): Path<String>,
    payload: Result<Json<AuthenticationInfoRequest>, JsonRejection>,
) -> Result<Json<AuthenticationInfoResult>, AppError> {
    tracing::info!("Received 5G AKA authentication data request for UE: {}", ue_id);

    let Json(payload) = payload.map_err(reject_body)?;
    let identity = validate_identity(&ue_id)?;
    let (serving_network_name, _ausf_instance_id) = payload.validate()?;
    crypto::validate_snn(serving_network_name).map_err(AppError::InvalidParameter)?;

    let supi = identity.as_str();
    let _guard = app_state.sqn_manager.lock(supi).await;

    let credential = load_credential(&app_state, supi).await?;
    let key_material = KeyMaterial::from_credential(&credential)?;

    let base_sqn = match payload.resynchronization_info.as_ref() {
        Some(resync) => {
            let sqn_ms = process_resynchronization(&key_material, resync)?;
            tracing::info!("Resynchronized sequence number for UE: {}", supi);
            sqn::advance(sqn_ms, 1)
        }
        None => sqn::parse(&credential.sqn_hex)?,
    };

    let vector = vectors::derive_he_av(&key_material, base_sqn, serving_network_name)?;

    persist_sqn(&app_state, supi, &credential, sqn::advance(base_sqn, 1)).await?;

    tracing::info!("Generated 5G HE AV for UE: {}", supi);

    Ok(Json(AuthenticationInfoResult {
        auth_type: AuthType::FiveGAka,
        authentication_vector: vector,
        supi: Some(supi.to_string()),
    }))
}

/// Nudm-UEAU RG auth-context read: reports whether the record carries
/// usable key material. Never derives, never moves the counter.
pub async fn get_rg_auth_context(
    State(app_state): State<AppState>,
    Path(ue_id): Path<String>,
) -> Result<Json<RgAuthCtx>, AppError> {
    tracing::info!("Received RG auth context request for UE: {}", ue_id);

    let identity = validate_identity(&ue_id)?;
    let supi = identity.as_str();

    let document = app_state
        .subscriber_store
        .find_by_id(supi)
        .await
        .map_err(|e| AppError::InternalError(format!("Subscriber lookup failed: {}", e)))?
        .ok_or_else(|| AppError::SubscriberNotFound(supi.to_string()))?;

    let credential = document.credential(&default_amf());

    Ok(Json(RgAuthCtx {
        auth_ind: credential.has_usable_credentials(),
        supi: Some(supi.to_string()),
    }))
}

/// Nudm-UEAU auth-event append.
pub async fn create_auth_event(
    State(app_state): State<AppState>,
    Path(ue_id): Path<String>,
    event: Result<Json<AuthEvent>, JsonRejection>,
) -> Result<Response, AppError> {
    tracing::info!("Received auth event for UE: {}", ue_id);

    let Json(event) = event.map_err(reject_body)?;
    let identity = validate_identity(&ue_id)?;
    event.validate()?;

    let supi = identity.as_str();
    ensure_subscriber_exists(&app_state, supi).await?;

    let id = Uuid::new_v4().to_string();
    let record = StoredAuthEvent {
        id: id.clone(),
        ue_id: supi.to_string(),
        event,
    };

    app_state
        .auth_event_store
        .append(record.clone())
        .await
        .map_err(|e| AppError::InternalError(format!("Failed to store auth event: {}", e)))?;

    let location = format!("/nudm-ueau/v1/{}/auth-events/{}", supi, id);

    tracing::info!("Stored auth event {} for UE: {}", id, supi);

    Ok((
        StatusCode::CREATED,
        [(axum::http::header::LOCATION, location)],
        Json(record.event),
    )
        .into_response())
}

/// Nudm-UEAU auth-event replace, keyed by {id, subscriber}.
pub async fn update_auth_event(
    State(app_state): State<AppState>,
    Path((ue_id, auth_event_id)): Path<(String, String)>,
    event: Result<Json<AuthEvent>, JsonRejection>,
) -> Result<StatusCode, AppError> {
    tracing::info!(
        "Received auth event update for UE: {}, event: {}",
        ue_id,
        auth_event_id
    );

    let Json(event) = event.map_err(reject_body)?;
    let identity = validate_identity(&ue_id)?;
    event.validate()?;

    let supi = identity.as_str();
    ensure_subscriber_exists(&app_state, supi).await?;

    app_state
        .auth_event_store
        .find_by_id_and_owner(&auth_event_id, supi)
        .await
        .map_err(|e| AppError::InternalError(format!("Auth event lookup failed: {}", e)))?
        .ok_or_else(|| {
            AppError::NotFound(format!("Auth event not found: {}", auth_event_id))
        })?;

    let modified = app_state
        .auth_event_store
        .replace(&auth_event_id, supi, event)
        .await
        .map_err(|e| AppError::InternalError(format!("Failed to replace auth event: {}", e)))?;

    if modified == 0 {
        return Err(AppError::UpdateFailed(format!(
            "Auth event update for {} modified no records",
            auth_event_id
        )));
    }

    tracing::info!("Replaced auth event {} for UE: {}", auth_event_id, supi);

    Ok(StatusCode::NO_CONTENT)
}

/// Nudm-UEAU HSS vector generation: a batch of 1..=32 vectors of the
/// family named in the request target.
pub async fn generate_hss_av(
    State(app_state): State<AppState>,
    Path((ue_id, hss_auth_type)): Path<(String, String)>,
    payload: Result<Json<HssAuthenticationInfoRequest>, JsonRejection>,
) -> Result<Json<HssAuthenticationInfoResult>, AppError> {
    tracing::info!(
        "Received HSS AV request for UE: {}, family: {}",
        ue_id,
        hss_auth_type
    );

    let Json(payload) = payload.map_err(reject_body)?;
    let identity = validate_identity(&ue_id)?;

    let uri_family = HssAuthType::from_path(&hss_auth_type).ok_or_else(|| {
        AppError::InvalidParameter(format!(
            "Unknown hssAuthType in request target: {}",
            hss_auth_type
        ))
    })?;
    let (family, count) = payload.validate(uri_family)?;

    let (mcc, mnc) = match payload.serving_network_id.as_ref() {
        Some(plmn) => (plmn.mcc.clone(), plmn.mnc.clone()),
        None => home_plmn(),
    };
    let plmn_id = crypto::plmn_id_bytes(&mcc, &mnc).map_err(AppError::InvalidParameter)?;
    let access_network_id = access_network_id(payload.serving_network_id.as_ref());

    let supi = identity.as_str();
    let _guard = app_state.sqn_manager.lock(supi).await;

    let credential = load_credential(&app_state, supi).await?;
    let key_material = KeyMaterial::from_credential(&credential)?;
    let base_sqn = sqn::parse(&credential.sqn_hex)?;

    let vectors = vectors::derive_hss_batch(
        &key_material,
        base_sqn,
        count,
        family,
        &plmn_id,
        &access_network_id,
    )?;

    persist_sqn(&app_state, supi, &credential, sqn::advance(base_sqn, count)).await?;

    tracing::info!(
        "Generated {} {} vector(s) for UE: {}",
        vectors.len(),
        family.as_str(),
        supi
    );

    Ok(Json(HssAuthenticationInfoResult {
        hss_authentication_vectors: vectors,
        supported_features: payload.supported_features.clone(),
    }))
}

/// Nudm-UEAU GBA vector generation: one UMTS-shaped vector.
pub async fn generate_gba_av(
    State(app_state): State<AppState>,
    Path(ue_id): Path<String>,
    payload: Result<Json<GbaAuthenticationInfoRequest>, JsonRejection>,
) -> Result<Json<GbaAuthenticationInfoResult>, AppError> {
    tracing::info!("Received GBA AV request for UE: {}", ue_id);

    let Json(payload) = payload.map_err(reject_body)?;
    let identity = validate_identity(&ue_id)?;
    payload.validate()?;

    let supi = identity.as_str();
    let _guard = app_state.sqn_manager.lock(supi).await;

    let credential = load_credential(&app_state, supi).await?;
    let key_material = KeyMaterial::from_credential(&credential)?;
    let base_sqn = sqn::parse(&credential.sqn_hex)?;

    let vector = vectors::derive_gba_av(&key_material, base_sqn)?;

    persist_sqn(&app_state, supi, &credential, sqn::advance(base_sqn, 1)).await?;

    tracing::info!("Generated GBA AV for UE: {}", supi);

    Ok(Json(GbaAuthenticationInfoResult {
        three_g_aka_av: vector,
        supported_features: payload.supported_features.clone(),
    }))
}

fn reject_body(rejection: JsonRejection) -> AppError {
    AppError::InvalidParameter(format!("Invalid request body: {}", rejection.body_text()))
}

fn validate_identity(ue_id: &str) -> Result<UeIdentity, AppError> {
    let identity = UeIdentity::parse(ue_id).map_err(AppError::InvalidParameter)?;
    if identity.is_concealed() {
        return Err(AppError::NotImplemented(
            "SUCI de-concealment is not supported by this function".to_string(),
        ));
    }
    Ok(identity)
}

async fn load_credential(
    app_state: &AppState,
    supi: &str,
) -> Result<SubscriberCredential, AppError> {
    let document = app_state
        .subscriber_store
        .find_by_id(supi)
        .await
        .map_err(|e| AppError::InternalError(format!("Subscriber lookup failed: {}", e)))?
        .ok_or_else(|| AppError::SubscriberNotFound(supi.to_string()))?;

    if let Some(provider) = document
        .provider_metadata
        .as_ref()
        .and_then(|metadata| metadata.provider.as_deref())
    {
        tracing::debug!("Subscriber {} provisioned by {}", supi, provider);
    }

    let credential = document.credential(&default_amf());
    credential.ensure_complete()?;
    Ok(credential)
}

async fn ensure_subscriber_exists(app_state: &AppState, supi: &str) -> Result<(), AppError> {
    app_state
        .subscriber_store
        .find_by_id(supi)
        .await
        .map_err(|e| AppError::InternalError(format!("Subscriber lookup failed: {}", e)))?
        .ok_or_else(|| AppError::SubscriberNotFound(supi.to_string()))?;
    Ok(())
}

// The counter moves only after every vector in the batch derived.
async fn persist_sqn(
    app_state: &AppState,
    supi: &str,
    credential: &SubscriberCredential,
    new_value: u64,
) -> Result<(), AppError> {
    let modified = app_state
        .subscriber_store
        .update_sequence_number(supi, credential.sqn_location, &sqn::encode(new_value))
        .await
        .map_err(|e| AppError::InternalError(format!("Failed to persist sequence number: {}", e)))?;

    if modified == 0 {
        return Err(AppError::UpdateFailed(format!(
            "Sequence number update for {} modified no records",
            supi
        )));
    }
    Ok(())
}

fn process_resynchronization(
    key_material: &KeyMaterial,
    resync: &ResynchronizationInfo,
) -> Result<u64, AppError> {
    let rand = hex::decode(&resync.rand).map_err(|_| {
        AppError::InvalidParameter("resynchronizationInfo.rand is not hex".to_string())
    })?;
    if rand.len() != crypto::rand::RAND_LEN {
        return Err(AppError::InvalidParameter(format!(
            "resynchronizationInfo.rand must be {} bytes, got {}",
            crypto::rand::RAND_LEN,
            rand.len()
        )));
    }

    let auts = hex::decode(&resync.auts).map_err(|_| {
        AppError::InvalidParameter("resynchronizationInfo.auts is not hex".to_string())
    })?;
    if auts.len() != vectors::AUTS_LEN {
        return Err(AppError::InvalidParameter(format!(
            "resynchronizationInfo.auts must be {} bytes, got {}",
            vectors::AUTS_LEN,
            auts.len()
        )));
    }

    let sqn_ms = vectors::recover_resync_sqn(key_material, &rand, &auts)?;
    Ok(sqn_ms)
}

fn default_amf() -> String {
    env::var("AUTH_AMF").unwrap_or_else(|_| "8000".to_string())
}

fn home_plmn() -> (String, String) {
    let plmn = env::var("HOME_PLMN").unwrap_or_else(|_| "001001".to_string());
    if plmn.len() == 5 || plmn.len() == 6 {
        (plmn[..3].to_string(), plmn[3..].to_string())
    } else {
        ("001".to_string(), "001".to_string())
    }
}

fn access_network_id(serving_network_id: Option<&PlmnId>) -> String {
    if let Ok(ani) = env::var("ACCESS_NETWORK_ID") {
        if !ani.is_empty() {
            return ani;
        }
    }

    let (mcc, mnc) = match serving_network_id {
        Some(plmn) => (plmn.mcc.clone(), plmn.mnc.clone()),
        None => home_plmn(),
    };
    format!("wlan.mnc{:0>3}.mcc{}.3gppnetwork.org", mnc, mcc)
}
