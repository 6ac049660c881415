use axum::{response::Json, routing::post, Router};

use relay_agent::{generate_report, lookup_projects, DexScreener, ProjectSummary};

use crate::{
    payload::{ProjectsRequest, ReportRequest, ReportResponse},
    state::AppState,
};

pub fn project_router() -> Router<AppState> {
    Router::new()
        .route("/projects", post(get_projects))
        .route("/report", post(get_report))
}

async fn get_projects(Json(request): Json<ProjectsRequest>) -> Json<Vec<ProjectSummary>> {
    Json(lookup_projects(&DexScreener, &request.tweets).await)
}

async fn get_report(Json(request): Json<ReportRequest>) -> Json<ReportResponse> {
    Json(ReportResponse {
        messages: generate_report(&request.projects),
    })
}
