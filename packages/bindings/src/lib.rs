use napi::Result as NapiResult;
use napi_derive::napi;

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

// ---------------------------------------------------------------------------
// Commission
// ---------------------------------------------------------------------------

#[napi]
pub fn calculate_commission(input_json: String) -> NapiResult<String> {
    let input: microfin_core::commission::CommissionInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output =
        microfin_core::commission::analyze_commission(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn project_commission(input_json: String) -> NapiResult<String> {
    let input: microfin_core::commission::ProjectionInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output =
        microfin_core::commission::analyze_projection(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn calculate_agent_commissions(input_json: String) -> NapiResult<String> {
    let input: microfin_core::commission::AgentCommissionInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = microfin_core::commission::analyze_agent_commissions(&input)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

/// The built-in rate card, so the UI can show and edit it.
#[napi]
pub fn default_commission_config() -> NapiResult<String> {
    let config = microfin_core::commission::CommissionConfig::default();
    serde_json::to_string(&config).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Payment schedule
// ---------------------------------------------------------------------------

#[napi]
pub fn calculate_payment_schedule(input_json: String) -> NapiResult<String> {
    let input: microfin_core::schedule::PaymentScheduleInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output =
        microfin_core::schedule::build_payment_schedule(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn allocate_payments(input_json: String) -> NapiResult<String> {
    let input: microfin_core::schedule::PaymentAllocationInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = microfin_core::schedule::analyze_payment_allocation(&input)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}
