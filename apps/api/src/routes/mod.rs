pub mod health;

use axum::{
    middleware,
    routing::{delete, get, patch, post, put},
    Router,
};

use crate::auth::middleware::require_auth;
use crate::state::AppState;
use crate::{
    applications, auth, categories, chats, companies, resumes, skills, stats, users, vacancies,
};

pub fn build_router(state: AppState) -> Router {
    let public = Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/auth/register", post(auth::handlers::handle_register))
        .route("/api/v1/auth/login", post(auth::handlers::handle_login));

    let protected = Router::new()
        // Auth
        .route("/api/v1/auth/logout", post(auth::handlers::handle_logout))
        .route("/api/v1/auth/me", get(auth::handlers::handle_me))
        // Users (admin)
        .route("/api/v1/users", get(users::handlers::handle_list_users))
        .route("/api/v1/users/:id", get(users::handlers::handle_get_user))
        .route("/api/v1/users/:id", patch(users::handlers::handle_update_user))
        .route("/api/v1/users/:id", delete(users::handlers::handle_delete_user))
        // Companies
        .route("/api/v1/companies", get(companies::handlers::handle_list_companies))
        .route("/api/v1/companies", post(companies::handlers::handle_create_company))
        .route("/api/v1/companies/:id", get(companies::handlers::handle_get_company))
        .route("/api/v1/companies/:id", put(companies::handlers::handle_update_company))
        .route("/api/v1/companies/:id", delete(companies::handlers::handle_delete_company))
        // Categories
        .route("/api/v1/categories", get(categories::handlers::handle_list_categories))
        .route("/api/v1/categories", post(categories::handlers::handle_create_category))
        .route("/api/v1/categories/:id", get(categories::handlers::handle_get_category))
        .route("/api/v1/categories/:id", put(categories::handlers::handle_update_category))
        .route("/api/v1/categories/:id", delete(categories::handlers::handle_delete_category))
        // Vacancies
        .route("/api/v1/vacancies", get(vacancies::handlers::handle_list_vacancies))
        .route("/api/v1/vacancies", post(vacancies::handlers::handle_create_vacancy))
        .route("/api/v1/vacancies/assist", post(vacancies::handlers::handle_assist))
        .route("/api/v1/vacancies/draft", post(vacancies::handlers::handle_draft))
        .route("/api/v1/vacancies/:id", get(vacancies::handlers::handle_get_vacancy))
        .route("/api/v1/vacancies/:id", put(vacancies::handlers::handle_update_vacancy))
        .route("/api/v1/vacancies/:id", delete(vacancies::handlers::handle_delete_vacancy))
        // Resumes
        .route("/api/v1/resumes", get(resumes::handlers::handle_list_resumes))
        .route("/api/v1/resumes", post(resumes::handlers::handle_create_resume))
        .route("/api/v1/resumes/upload", post(resumes::handlers::handle_upload_resume))
        .route("/api/v1/resumes/:id", get(resumes::handlers::handle_get_resume))
        .route("/api/v1/resumes/:id", put(resumes::handlers::handle_update_resume))
        .route("/api/v1/resumes/:id", delete(resumes::handlers::handle_delete_resume))
        // Applications
        .route("/api/v1/applications", get(applications::handlers::handle_list_applications))
        .route("/api/v1/applications", post(applications::handlers::handle_create_application))
        .route("/api/v1/applications/:id", get(applications::handlers::handle_get_application))
        .route(
            "/api/v1/applications/:id/status",
            patch(applications::handlers::handle_update_status),
        )
        .route(
            "/api/v1/applications/:id",
            delete(applications::handlers::handle_delete_application),
        )
        // Screening chats
        .route("/api/v1/chats", get(chats::handlers::handle_list_chats))
        .route("/api/v1/chats", post(chats::handlers::handle_create_chat))
        .route("/api/v1/chats/:id", get(chats::handlers::handle_get_chat))
        .route("/api/v1/chats/:id/messages", post(chats::handlers::handle_post_message))
        .route("/api/v1/chats/:id/evaluate", post(chats::handlers::handle_evaluate_chat))
        // Skills
        .route("/api/v1/skills", get(skills::handlers::handle_list_skills))
        .route("/api/v1/skills", post(skills::handlers::handle_create_skill))
        .route("/api/v1/skills/:id", delete(skills::handlers::handle_delete_skill))
        // Stats
        .route("/api/v1/stats/overview", get(stats::handlers::handle_stats_overview))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    public.merge(protected).with_state(state)
}
