use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use log::{info, warn};
use serde_json::{Value, json};
use warp::http::StatusCode;
use warp::{Filter, Rejection, Reply};

use super::storage::{NOTES_KEY, RecordStorage};

const MAX_BODY_BYTES: u64 = 1024 * 1024;

pub type SharedStorage = Arc<dyn RecordStorage>;

fn get_notes(storage: &dyn RecordStorage) -> (StatusCode, Value) {
    match storage.get(NOTES_KEY) {
        Ok(record) => (StatusCode::OK, record.unwrap_or_else(|| json!({}))),
        Err(error) => {
            warn!("failed to read notes: {error:#}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "error": format!("{error:#}") }),
            )
        }
    }
}

fn put_notes(storage: &dyn RecordStorage, record: Value) -> (StatusCode, Value) {
    if !record.is_object() {
        return (
            StatusCode::BAD_REQUEST,
            json!({ "error": "notes record must be a JSON object" }),
        );
    }

    match storage.put(NOTES_KEY, record) {
        Ok(()) => {
            info!("notes saved");
            (StatusCode::OK, json!({ "message": "Notes saved" }))
        }
        Err(error) => {
            warn!("failed to save notes: {error:#}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "error": format!("{error:#}") }),
            )
        }
    }
}

fn json_reply((status, body): (StatusCode, Value)) -> warp::reply::WithStatus<warp::reply::Json> {
    warp::reply::with_status(warp::reply::json(&body), status)
}

async fn handle_rejection(rejection: Rejection) -> Result<Box<dyn Reply>, Infallible> {
    if rejection.is_not_found() {
        return Ok(Box::new(warp::reply::with_status(
            "Not Found",
            StatusCode::NOT_FOUND,
        )));
    }

    let (status, message) = if let Some(error) = rejection.find::<warp::body::BodyDeserializeError>()
    {
        (StatusCode::BAD_REQUEST, error.to_string())
    } else if rejection.find::<warp::reject::PayloadTooLarge>().is_some() {
        (StatusCode::PAYLOAD_TOO_LARGE, "request body too large".to_owned())
    } else if rejection.find::<warp::reject::MethodNotAllowed>().is_some() {
        (StatusCode::METHOD_NOT_ALLOWED, "method not allowed".to_owned())
    } else {
        warn!("unhandled rejection: {rejection:?}");
        (StatusCode::BAD_REQUEST, "bad request".to_owned())
    };

    Ok(Box::new(json_reply((status, json!({ "error": message })))))
}

fn routes(
    storage: SharedStorage,
) -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone + Send + Sync + 'static {
    let with_storage = warp::any().map(move || Arc::clone(&storage));
    let nodes = warp::path!("api" / "nodes");

    let get = nodes
        .and(warp::get())
        .and(with_storage.clone())
        .map(|storage: SharedStorage| json_reply(get_notes(storage.as_ref())));

    let put = nodes
        .and(warp::put())
        .and(warp::body::content_length_limit(MAX_BODY_BYTES))
        .and(warp::body::json())
        .and(with_storage)
        .map(|record: Value, storage: SharedStorage| {
            json_reply(put_notes(storage.as_ref(), record))
        });

    let cors = warp::cors()
        .allow_any_origin()
        .allow_methods(vec!["GET", "PUT"])
        .allow_header("content-type");

    get.or(put).unify().recover(handle_rejection).with(cors)
}

async fn run(bind: SocketAddr, storage: SharedStorage) -> Result<()> {
    info!("notes server listening on http://{bind}/api/nodes");
    tokio::select! {
        _ = warp::serve(routes(storage)).run(bind) => {}
        signal = tokio::signal::ctrl_c() => {
            signal.context("failed to listen for ctrl-c")?;
            info!("notes server shutting down");
        }
    }
    Ok(())
}

/// Runs the notes server until it fails or the process receives ctrl-c.
pub fn serve(bind: SocketAddr, storage: SharedStorage) -> Result<()> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to start the async runtime")?;

    runtime.block_on(run(bind, storage))
}
