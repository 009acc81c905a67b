//! Background API calls.
//!
//! Every network operation runs as a detached tokio task that reports back
//! through the action channel; the UI loop itself never awaits the network.
//! Form-scoped results carry the session generation so replaced sessions can
//! discard them.

use tokio::sync::mpsc::UnboundedSender;

use fleet_api::{FleetClient, SearchParams};
use forms::{FormMode, WireValue};

use crate::action::{Action, FormEvent};
use crate::notify::Notice;
use crate::store::StoreEvent;

pub fn fetch_table_headers(client: FleetClient, tx: UnboundedSender<Action>) {
    tokio::spawn(async move {
        match client.table_headers().await {
            Ok(headers) => {
                let _ = tx.send(Action::Store(StoreEvent::HeadersLoaded(headers)));
            }
            Err(err) => {
                tracing::error!(%err, "failed to fetch table headers");
                let _ = tx.send(Action::Notify(Notice::error(format!(
                    "Failed to load table columns: {err}"
                ))));
            }
        }
    });
}

pub fn fetch_cars(client: FleetClient, params: SearchParams, tx: UnboundedSender<Action>) {
    tokio::spawn(async move {
        let _ = tx.send(Action::Store(StoreEvent::CarsLoading));
        match client.list_cars(&params).await {
            Ok(page) => {
                let _ = tx.send(Action::Store(StoreEvent::CarsLoaded(page)));
            }
            Err(err) => {
                tracing::error!(%err, "failed to fetch cars");
                let _ = tx.send(Action::Store(StoreEvent::CarsFailed(err.to_string())));
                let _ = tx.send(Action::Notify(Notice::error(format!(
                    "Failed to load cars: {err}"
                ))));
            }
        }
    });
}

pub fn fetch_create_schema(client: FleetClient, generation: u64, tx: UnboundedSender<Action>) {
    tokio::spawn(async move {
        match client.create_headers().await {
            Ok(fields) => {
                let _ = tx.send(Action::Form(FormEvent::SchemaLoaded { generation, fields }));
            }
            Err(err) => {
                tracing::error!(%err, "failed to fetch creation schema");
                let _ = tx.send(Action::Form(FormEvent::LoadFailed {
                    generation,
                    message: err.to_string(),
                }));
            }
        }
    });
}

pub fn fetch_car_detail(
    client: FleetClient,
    object_uuid: String,
    generation: u64,
    tx: UnboundedSender<Action>,
) {
    tokio::spawn(async move {
        match client.car_detail(&object_uuid).await {
            Ok(detail) => {
                let _ = tx.send(Action::Form(FormEvent::DetailLoaded { generation, detail }));
            }
            Err(err) => {
                tracing::error!(%err, object_uuid, "failed to fetch car detail");
                let _ = tx.send(Action::Form(FormEvent::LoadFailed {
                    generation,
                    message: err.to_string(),
                }));
            }
        }
    });
}

pub fn submit_form(
    client: FleetClient,
    generation: u64,
    mode: FormMode,
    payload: Vec<WireValue>,
    tx: UnboundedSender<Action>,
) {
    tokio::spawn(async move {
        let result = match &mode {
            FormMode::Create => client.create_car(&payload).await,
            FormMode::Edit { object_uuid } => client.update_car(object_uuid, &payload).await,
        };
        match result {
            Ok(()) => {
                let _ = tx.send(Action::Form(FormEvent::SubmitDone {
                    generation,
                    result: Ok(()),
                }));
            }
            Err(err) => {
                tracing::error!(%err, "persistence call failed");
                let _ = tx.send(Action::Form(FormEvent::SubmitDone {
                    generation,
                    result: Err(err.to_string()),
                }));
            }
        }
    });
}

pub fn soft_delete_car(client: FleetClient, object_uuid: String, tx: UnboundedSender<Action>) {
    tokio::spawn(async move {
        match client.soft_delete(&object_uuid).await {
            Ok(()) => {
                let _ = tx.send(Action::Store(StoreEvent::CarRemoved(object_uuid)));
                let _ = tx.send(Action::Notify(Notice::success("Car deleted")));
            }
            Err(err) => {
                tracing::error!(%err, object_uuid, "failed to soft-delete car");
                let _ = tx.send(Action::Notify(Notice::error(format!(
                    "Failed to delete car: {err}"
                ))));
            }
        }
    });
}
