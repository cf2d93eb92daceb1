use crate::handlers::http::{AppState, routes};

pub async fn run_api(state: AppState, port: u16) {
    let api = routes(state);
    tracing::info!(port, "serving calendar assistant api");
    warp::serve(api).run(([0, 0, 0, 0], port)).await;
}
