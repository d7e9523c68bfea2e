use crate::bridge::model::BridgeState;
use benchcore::processing::BenchOverride;
use serde_json::json;
use std::{net::SocketAddr, thread};
use tokio::runtime::Builder;
use warp::{http::StatusCode, Filter};

pub fn bridge_bind_address() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 9000))
}

fn not_found(index: usize) -> warp::reply::WithStatus<warp::reply::Json> {
    warp::reply::with_status(
        warp::reply::json(&json!({"error": format!("no section at index {}", index)})),
        StatusCode::NOT_FOUND,
    )
}

fn internal_error(err: anyhow::Error) -> warp::reply::WithStatus<warp::reply::Json> {
    log::error!("bridge request failed: {:#}", err);
    warp::reply::with_status(
        warp::reply::json(&json!({"error": format!("{:#}", err)})),
        StatusCode::INTERNAL_SERVER_ERROR,
    )
}

fn ok<T: serde::Serialize>(body: &T) -> warp::reply::WithStatus<warp::reply::Json> {
    warp::reply::with_status(warp::reply::json(body), StatusCode::OK)
}

/// All bridge routes over a shared state.
pub fn routes(
    state: BridgeState,
) -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
    let state_filter = warp::any().map(move || state.clone());

    let results_route = warp::path("results")
        .and(warp::path::end())
        .and(warp::get())
        .and(state_filter.clone())
        .map(|state: BridgeState| match state.results() {
            Ok(results) => ok(&results),
            Err(err) => internal_error(err),
        });

    let summary_route = warp::path("summary")
        .and(warp::path::end())
        .and(warp::get())
        .and(state_filter.clone())
        .map(|state: BridgeState| ok(&state.summary()));

    let profile_route = warp::path!("profiles" / usize)
        .and(warp::get())
        .and(state_filter.clone())
        .map(|index: usize, state: BridgeState| match state.profile(index) {
            Some(view) => ok(&view),
            None => not_found(index),
        });

    let edit_route = warp::path!("reconciled" / usize)
        .and(warp::put())
        .and(warp::body::json())
        .and(state_filter)
        .map(
            |index: usize, overrides: Vec<BenchOverride>, state: BridgeState| {
                match state.edit(index, &overrides) {
                    Ok(Some(response)) => ok(&response),
                    Ok(None) => not_found(index),
                    Err(err) => internal_error(err),
                }
            },
        );

    results_route
        .or(summary_route)
        .or(profile_route)
        .or(edit_route)
}

/// Hosts the bridge routes on a background thread with its own runtime.
pub fn spawn(state: BridgeState) {
    let sections = state.section_count();
    thread::spawn(move || {
        let runtime = match Builder::new_current_thread().enable_all().build() {
            Ok(runtime) => runtime,
            Err(err) => {
                log::error!("failed to build bridge runtime: {}", err);
                return;
            }
        };
        runtime.block_on(async move {
            warp::serve(routes(state)).run(bridge_bind_address()).await;
        });
    });
    log::info!(
        "bridge listening on http://{} ({} sections)",
        bridge_bind_address(),
        sections
    );
}
