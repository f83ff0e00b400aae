//! # IPC Bridge
//!
//! The UI talks to the till over newline-delimited JSON. One request per
//! line in, one response per line out.
//!
//! ## Wire Format
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Request                                                                │
//! │  {"cmd":"add_selection","selection":{"productId":"p-1",                 │
//! │   "variant":"Large","addOns":{"a-1":2},"quantity":1}}                   │
//! │                                                                         │
//! │  Success                                                                │
//! │  {"ok":true,"data":{"tickets":[...],"activeTicketId":"...",             │
//! │   "totals":{...}}}                                                      │
//! │                                                                         │
//! │  Failure                                                                │
//! │  {"ok":false,"error":{"code":"NOT_FOUND",                               │
//! │   "message":"Product not found: p-404"}}                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tableside_core::{DiscountSpec, OrderDetails, OrderSnapshot, Selection};
use tracing::warn;

use crate::catalog::Catalog;
use crate::commands::{config, discount, edit, session, submit, ticket};
use crate::error::ApiError;
use crate::state::{EditState, SessionState, TillConfig};
use crate::submit::OrderSubmitter;

/// One UI request.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "cmd", rename_all = "snake_case")]
pub enum TillRequest {
    GetStoreInfo,
    GetMenu,
    GetSession,
    GetTotals,
    AddSelection {
        selection: Selection,
    },
    #[serde(rename_all = "camelCase")]
    UpdateQuantity {
        line_id: String,
        delta: i64,
    },
    #[serde(rename_all = "camelCase")]
    RemoveLine {
        line_id: String,
    },
    ClearTicket,
    OpenTicket,
    #[serde(rename_all = "camelCase")]
    CloseTicket {
        ticket_id: String,
    },
    #[serde(rename_all = "camelCase")]
    SetActiveTicket {
        ticket_id: String,
    },
    SetOrderDetails {
        details: OrderDetails,
    },
    #[serde(rename_all = "camelCase")]
    SetNotes {
        #[serde(default)]
        kitchen_note: Option<String>,
        #[serde(default)]
        order_note: Option<String>,
    },
    ApplyDiscount {
        spec: DiscountSpec,
    },
    BeginEdit {
        snapshot: OrderSnapshot,
    },
    EditAdd {
        selection: Selection,
    },
    #[serde(rename_all = "camelCase")]
    EditUpdateQuantity {
        line_id: String,
        delta: i64,
    },
    #[serde(rename_all = "camelCase")]
    EditRemoveLine {
        line_id: String,
    },
    EditDelta,
    CancelEdit,
    SubmitActiveTicket,
    SubmitEdit,
}

/// Response envelope written back to the UI.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum TillResponse {
    Ok { ok: bool, data: Value },
    Err { ok: bool, error: ApiError },
}

impl TillResponse {
    fn from_result(result: Result<Value, ApiError>) -> Self {
        match result {
            Ok(data) => TillResponse::Ok { ok: true, data },
            Err(error) => TillResponse::Err { ok: false, error },
        }
    }
}

fn to_value<T: Serialize>(value: T) -> Result<Value, ApiError> {
    serde_json::to_value(value).map_err(|e| ApiError::internal(e.to_string()))
}

/// Everything a request may touch.
pub struct Till<C, S> {
    pub catalog: C,
    pub config: TillConfig,
    pub session: SessionState,
    pub edits: EditState,
    pub submitter: S,
}

impl<C: Catalog, S: OrderSubmitter> Till<C, S> {
    pub fn new(catalog: C, config: TillConfig, submitter: S) -> Self {
        Till {
            catalog,
            config,
            session: SessionState::new(),
            edits: EditState::new(),
            submitter,
        }
    }

    /// Runs one request against the till.
    pub async fn dispatch(&self, request: TillRequest) -> Result<Value, ApiError> {
        let (catalog, cfg, sess, edits) = (&self.catalog, &self.config, &self.session, &self.edits);

        match request {
            TillRequest::GetStoreInfo => to_value(config::get_store_info(cfg)),
            TillRequest::GetMenu => to_value(config::get_menu(catalog)),
            TillRequest::GetSession => to_value(ticket::get_session(sess, cfg)),
            TillRequest::GetTotals => to_value(ticket::get_totals(sess, cfg)),
            TillRequest::AddSelection { selection } => {
                to_value(ticket::add_selection(catalog, sess, cfg, selection)?)
            }
            TillRequest::UpdateQuantity { line_id, delta } => {
                to_value(ticket::update_quantity(sess, cfg, &line_id, delta)?)
            }
            TillRequest::RemoveLine { line_id } => to_value(ticket::remove_line(sess, cfg, &line_id)?),
            TillRequest::ClearTicket => to_value(ticket::clear_ticket(sess, cfg)),
            TillRequest::OpenTicket => to_value(session::open_ticket(sess, cfg)),
            TillRequest::CloseTicket { ticket_id } => {
                to_value(session::close_ticket(sess, cfg, &ticket_id))
            }
            TillRequest::SetActiveTicket { ticket_id } => {
                to_value(session::set_active_ticket(sess, cfg, &ticket_id))
            }
            TillRequest::SetOrderDetails { details } => {
                to_value(ticket::set_order_details(sess, cfg, details)?)
            }
            TillRequest::SetNotes {
                kitchen_note,
                order_note,
            } => to_value(ticket::set_notes(sess, cfg, kitchen_note, order_note)?),
            TillRequest::ApplyDiscount { spec } => to_value(discount::apply_discount(catalog, cfg, spec)?),
            TillRequest::BeginEdit { snapshot } => to_value(edit::begin_edit(edits, snapshot)?),
            TillRequest::EditAdd { selection } => to_value(edit::edit_add(catalog, edits, selection)?),
            TillRequest::EditUpdateQuantity { line_id, delta } => {
                to_value(edit::edit_update_quantity(edits, &line_id, delta)?)
            }
            TillRequest::EditRemoveLine { line_id } => {
                to_value(edit::edit_remove_line(edits, &line_id)?)
            }
            TillRequest::EditDelta => to_value(edit::edit_delta(edits)?),
            TillRequest::CancelEdit => to_value(edit::cancel_edit(edits)?),
            TillRequest::SubmitActiveTicket => {
                to_value(submit::submit_active_ticket(sess, cfg, &self.submitter).await?)
            }
            TillRequest::SubmitEdit => to_value(submit::submit_edit(edits, &self.submitter).await?),
        }
    }

    /// Parses one line, runs it, and renders the response line.
    pub async fn handle_line(&self, line: &str) -> String {
        let result = match serde_json::from_str::<TillRequest>(line) {
            Ok(request) => self.dispatch(request).await,
            Err(e) => {
                warn!(error = %e, "Malformed request");
                Err(ApiError::bad_request(format!("Malformed request: {}", e)))
            }
        };

        serde_json::to_string(&TillResponse::from_result(result)).unwrap_or_else(|e| {
            format!(
                r#"{{"ok":false,"error":{{"code":"INTERNAL","message":"{}"}}}}"#,
                e.to_string().replace('"', "'")
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::MenuCatalog;
    use crate::commands::fixtures::{config, menu};
    use crate::submit::RecordingSubmitter;

    fn till() -> Till<MenuCatalog, RecordingSubmitter> {
        Till::new(menu(), config(), RecordingSubmitter::new())
    }

    async fn call(till: &Till<MenuCatalog, RecordingSubmitter>, line: &str) -> Value {
        serde_json::from_str(&till.handle_line(line).await).unwrap()
    }

    #[test]
    fn test_parse_requests() {
        let req: TillRequest =
            serde_json::from_str(r#"{"cmd":"update_quantity","lineId":"l-1","delta":-1}"#).unwrap();
        assert_eq!(
            req,
            TillRequest::UpdateQuantity {
                line_id: "l-1".to_string(),
                delta: -1
            }
        );

        let req: TillRequest = serde_json::from_str(r#"{"cmd":"open_ticket"}"#).unwrap();
        assert_eq!(req, TillRequest::OpenTicket);

        let req: TillRequest =
            serde_json::from_str(r#"{"cmd":"set_notes","kitchenNote":"no ice"}"#).unwrap();
        assert_eq!(
            req,
            TillRequest::SetNotes {
                kitchen_note: Some("no ice".to_string()),
                order_note: None
            }
        );
    }

    #[tokio::test]
    async fn test_margherita_over_the_wire() {
        let till = till();
        let add = r#"{"cmd":"add_selection","selection":{"productId":"p-1","variant":"Large","addOns":{"a-1":2}}}"#;

        let first = call(&till, add).await;
        assert_eq!(first["ok"], true);
        assert_eq!(first["data"]["totals"]["subtotal"], 4730);

        let second = call(&till, add).await;
        let items = &second["data"]["tickets"][0]["items"];
        assert_eq!(items.as_array().unwrap().len(), 1);
        assert_eq!(items[0]["quantity"], 2);
        assert_eq!(items[0]["details"], "Large + Extra Cheese x2");
        assert_eq!(second["data"]["totals"]["subtotal"], 9460);
    }

    #[tokio::test]
    async fn test_errors_are_enveloped() {
        let till = till();

        let res = call(&till, r#"{"cmd":"remove_line","lineId":"nope"}"#).await;
        assert_eq!(res["ok"], false);
        assert_eq!(res["error"]["code"], "NOT_FOUND");

        let res = call(&till, "not json").await;
        assert_eq!(res["error"]["code"], "BAD_REQUEST");

        let res = call(&till, r#"{"cmd":"edit_delta"}"#).await;
        assert_eq!(res["error"]["code"], "EDIT_ERROR");
    }

    #[tokio::test]
    async fn test_out_of_range_quantities_are_rejected() {
        let till = till();
        let added = call(&till, r#"{"cmd":"add_selection","selection":{"productId":"p-1"}}"#).await;
        let line_id = added["data"]["tickets"][0]["items"][0]["id"].as_str().unwrap().to_string();

        let res = call(
            &till,
            r#"{"cmd":"add_selection","selection":{"productId":"p-1","addOns":{"a-1":4611686018427387903}}}"#,
        )
        .await;
        assert_eq!(res["ok"], false);
        assert_eq!(res["error"]["code"], "VALIDATION_ERROR");

        let step = format!(
            r#"{{"cmd":"update_quantity","lineId":"{}","delta":9223372036854775807}}"#,
            line_id
        );
        let res = call(&till, &step).await;
        assert_eq!(res["ok"], false);
        assert_eq!(res["error"]["code"], "VALIDATION_ERROR");

        let res = call(&till, r#"{"cmd":"get_session"}"#).await;
        assert_eq!(res["data"]["tickets"][0]["items"][0]["quantity"], 1);
        assert_eq!(res["data"]["totals"]["subtotal"], 2500);
    }

    #[tokio::test]
    async fn test_submit_over_the_wire() {
        let till = till();
        call(&till, r#"{"cmd":"add_selection","selection":{"productId":"p-2"}}"#).await;

        let res = call(&till, r#"{"cmd":"submit_active_ticket"}"#).await;
        assert_eq!(res["ok"], true);
        assert_eq!(res["data"]["receipt"]["orderNo"], "ORD-1001");
        assert_eq!(till.submitter.orders().await.len(), 1);
    }

    #[tokio::test]
    async fn test_edit_over_the_wire() {
        let till = till();
        let begin = r#"{"cmd":"begin_edit","snapshot":{"orderNo":"ORD-9","originalTotal":450,
            "lineItems":[{"id":"l-1","productId":"p-2","productName":"Lemonade",
            "details":"REGULAR","unitPrice":450,"quantity":1}],
            "placedAt":"2026-10-18T12:00:00Z"}}"#
            .replace('\n', "");

        let res = call(&till, &begin).await;
        assert_eq!(res["data"]["delta"]["settlement"]["kind"], "no_change");

        let res = call(&till, r#"{"cmd":"edit_update_quantity","lineId":"l-1","delta":2}"#).await;
        assert_eq!(res["data"]["delta"]["settlement"]["kind"], "additional_payment_due");
        assert_eq!(res["data"]["delta"]["settlement"]["amount"], 900);
    }
}
