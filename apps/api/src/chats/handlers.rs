use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::applications::handlers::{authorize_application_access, fetch_application};
use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::llm::ChatTurn;
use crate::models::application::{ApplicationRow, ApplicationStatus};
use crate::models::chat::{ChatRow, MessageRole, MessageRow};
use crate::models::resume::ResumeRow;
use crate::models::vacancy::VacancyRow;
use crate::resumes::handlers::fetch_resume;
use crate::screening::prompts::interviewer_system;
use crate::screening::{Evaluation, ScreeningContext};
use crate::state::AppState;
use crate::vacancies::handlers::fetch_vacancy;

const OPENING_PROMPT: &str = "Greet the candidate briefly and ask your first \
    screening question about their fit for this vacancy.";

#[derive(Debug, Deserialize)]
pub struct CreateChatRequest {
    pub application_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct ChatListQuery {
    pub application_id: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
pub struct PostMessageRequest {
    pub content: String,
    pub message_type: Option<String>,
}

/// A chat plus its ordered transcript, as returned to clients.
#[derive(Debug, Serialize)]
pub struct ChatResponse {
    #[serde(flatten)]
    pub chat: ChatRow,
    pub messages: Vec<MessageRow>,
}

/// POST /api/v1/chats
///
/// Opens the screening thread for an application. Asks the model for its
/// opening question first, then writes the chat row, the interviewer system
/// prompt, and the opening question in one transaction, so a failed LLM call
/// leaves nothing behind and the create stays retryable. One thread per
/// application; a second create returns 409.
pub async fn handle_create_chat(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(request): Json<CreateChatRequest>,
) -> Result<(StatusCode, Json<ChatResponse>), AppError> {
    let application = fetch_application(&state, request.application_id).await?;
    authorize_application_access(&state, &user, &application).await?;

    // Cheap pre-check; concurrent creates still resolve at the unique index.
    let existing: Option<Uuid> =
        sqlx::query_scalar("SELECT id FROM chats WHERE application_id = $1")
            .bind(application.id)
            .fetch_optional(&state.db)
            .await?;
    if existing.is_some() {
        return Err(AppError::Conflict(
            "A screening chat already exists for this application".to_string(),
        ));
    }

    let (vacancy, resume) = load_screening_inputs(&state, &application).await?;
    let system_prompt = interviewer_system(&vacancy, &resume);

    let opening = state
        .llm
        .chat(&system_prompt, &[ChatTurn::user(OPENING_PROMPT)])
        .await
        .map_err(|e| AppError::Llm(format!("Could not generate the opening question: {e}")))?;
    let opening_text = opening
        .text()
        .unwrap_or("Hello! Could you briefly describe your relevant experience?");

    let mut tx = state.db.begin().await?;
    let chat = sqlx::query_as::<_, ChatRow>(
        "INSERT INTO chats (id, application_id) VALUES ($1, $2) RETURNING *",
    )
    .bind(Uuid::new_v4())
    .bind(application.id)
    .fetch_one(&mut *tx)
    .await
    .map_err(|e| {
        AppError::conflict_on_unique(e, "A screening chat already exists for this application")
    })?;
    insert_message(&mut *tx, chat.id, MessageRole::System, &system_prompt, None).await?;
    insert_message(
        &mut *tx,
        chat.id,
        MessageRole::Assistant,
        opening_text,
        Some("question"),
    )
    .await?;
    tx.commit().await?;

    info!(chat_id = %chat.id, application_id = %application.id, "screening chat opened");

    let messages = fetch_messages(&state, chat.id).await?;
    Ok((StatusCode::CREATED, Json(ChatResponse { chat, messages })))
}

/// GET /api/v1/chats?application_id=
pub async fn handle_list_chats(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Query(query): Query<ChatListQuery>,
) -> Result<Json<Vec<ChatRow>>, AppError> {
    let application_id = query.application_id.ok_or_else(|| {
        AppError::Validation("application_id query parameter is required".to_string())
    })?;

    let application = fetch_application(&state, application_id).await?;
    authorize_application_access(&state, &user, &application).await?;

    let chats = sqlx::query_as::<_, ChatRow>(
        "SELECT * FROM chats WHERE application_id = $1 ORDER BY created_at",
    )
    .bind(application_id)
    .fetch_all(&state.db)
    .await?;

    Ok(Json(chats))
}

/// GET /api/v1/chats/:id
pub async fn handle_get_chat(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<ChatResponse>, AppError> {
    let chat = fetch_chat(&state, id).await?;
    let application = fetch_application(&state, chat.application_id).await?;
    authorize_application_access(&state, &user, &application).await?;

    let messages = fetch_messages(&state, chat.id).await?;
    Ok(Json(ChatResponse { chat, messages }))
}

/// POST /api/v1/chats/:id/messages
///
/// Appends the candidate's message, replays the transcript to the model,
/// and returns the interviewer's reply. Only the applicant speaks as the
/// candidate; employers and admins read the thread but do not post.
pub async fn handle_post_message(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(request): Json<PostMessageRequest>,
) -> Result<(StatusCode, Json<MessageRow>), AppError> {
    if request.content.trim().is_empty() {
        return Err(AppError::Validation("Message content is required".to_string()));
    }

    let chat = fetch_chat(&state, id).await?;
    let application = fetch_application(&state, chat.application_id).await?;
    if application.applicant_id != user.id {
        return Err(AppError::Forbidden);
    }

    insert_message(
        &state.db,
        chat.id,
        MessageRole::User,
        request.content.trim(),
        request.message_type.as_deref(),
    )
    .await?;

    let transcript = fetch_messages(&state, chat.id).await?;
    let (system_prompt, turns) = replay_transcript(&transcript);

    let reply = state
        .llm
        .chat(&system_prompt, &turns)
        .await
        .map_err(|e| AppError::Llm(format!("Could not generate the interviewer reply: {e}")))?;
    let reply_text = reply.text().ok_or_else(|| {
        AppError::Llm("The interviewer reply contained no text".to_string())
    })?;

    let stored = insert_message(
        &state.db,
        chat.id,
        MessageRole::Assistant,
        reply_text,
        Some("question"),
    )
    .await?;

    Ok((StatusCode::CREATED, Json(stored)))
}

/// POST /api/v1/chats/:id/evaluate
///
/// Runs the configured screener over the vacancy, resume, and transcript,
/// stores the result on the application, and marks it `reviewed`. Only the
/// vacancy owner or an admin may evaluate.
pub async fn handle_evaluate_chat(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<Evaluation>, AppError> {
    let chat = fetch_chat(&state, id).await?;
    let application = fetch_application(&state, chat.application_id).await?;

    if !user.is_admin() {
        let vacancy_owner: Option<Uuid> =
            sqlx::query_scalar("SELECT created_by FROM vacancies WHERE id = $1")
                .bind(application.vacancy_id)
                .fetch_optional(&state.db)
                .await?;
        if vacancy_owner != Some(user.id) {
            return Err(AppError::Forbidden);
        }
    }

    let (vacancy, resume) = load_screening_inputs(&state, &application).await?;
    let transcript = fetch_messages(&state, chat.id).await?;

    let evaluation = state
        .screener
        .evaluate(&ScreeningContext {
            vacancy: &vacancy,
            resume: &resume,
            transcript: &transcript,
        })
        .await?;

    sqlx::query(
        "UPDATE applications SET evaluation = $2, status = $3, updated_at = now() WHERE id = $1",
    )
    .bind(application.id)
    .bind(serde_json::to_value(&evaluation)?)
    .bind(ApplicationStatus::Reviewed)
    .execute(&state.db)
    .await?;

    info!(
        application_id = %application.id,
        score = evaluation.score,
        backend = %evaluation.backend,
        "screening evaluation stored"
    );

    Ok(Json(evaluation))
}

/// Rebuilds the (system, turns) pair the completion API expects from the
/// stored transcript. The system message is stored as the first row. The
/// opening instruction that elicited the interviewer's first question is not
/// stored, so it is restored here; without it the replayed conversation
/// would begin with an assistant turn, which the API rejects.
fn replay_transcript(transcript: &[MessageRow]) -> (String, Vec<ChatTurn>) {
    let mut system = String::new();
    let mut turns = Vec::with_capacity(transcript.len() + 1);
    turns.push(ChatTurn::user(OPENING_PROMPT));
    for message in transcript {
        match message.role {
            MessageRole::System => system = message.content.clone(),
            MessageRole::User => turns.push(ChatTurn::user(message.content.clone())),
            MessageRole::Assistant => turns.push(ChatTurn::assistant(message.content.clone())),
        }
    }
    (system, turns)
}

async fn load_screening_inputs(
    state: &AppState,
    application: &ApplicationRow,
) -> Result<(VacancyRow, ResumeRow), AppError> {
    let vacancy = fetch_vacancy(state, application.vacancy_id).await?;
    let resume = fetch_resume(state, application.resume_id).await?;
    Ok((vacancy, resume))
}

async fn fetch_chat(state: &AppState, id: Uuid) -> Result<ChatRow, AppError> {
    sqlx::query_as::<_, ChatRow>("SELECT * FROM chats WHERE id = $1")
        .bind(id)
        .fetch_optional(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Chat {id} not found")))
}

async fn fetch_messages(state: &AppState, chat_id: Uuid) -> Result<Vec<MessageRow>, AppError> {
    let rows = sqlx::query_as::<_, MessageRow>(
        "SELECT * FROM chat_messages WHERE chat_id = $1 ORDER BY seq",
    )
    .bind(chat_id)
    .fetch_all(&state.db)
    .await?;
    Ok(rows)
}

async fn insert_message<'e>(
    executor: impl sqlx::PgExecutor<'e>,
    chat_id: Uuid,
    role: MessageRole,
    content: &str,
    message_type: Option<&str>,
) -> Result<MessageRow, AppError> {
    let row = sqlx::query_as::<_, MessageRow>(
        "INSERT INTO chat_messages (id, chat_id, role, content, message_type)
         VALUES ($1, $2, $3, $4, $5)
         RETURNING *",
    )
    .bind(Uuid::new_v4())
    .bind(chat_id)
    .bind(role)
    .bind(content)
    .bind(message_type)
    .fetch_one(executor)
    .await?;
    Ok(row)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn message(seq: i64, role: MessageRole, content: &str) -> MessageRow {
        MessageRow {
            id: Uuid::new_v4(),
            chat_id: Uuid::new_v4(),
            seq,
            role,
            content: content.to_string(),
            message_type: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_replay_transcript_splits_system_from_turns() {
        let transcript = vec![
            message(1, MessageRole::System, "interviewer instructions"),
            message(2, MessageRole::Assistant, "First question?"),
            message(3, MessageRole::User, "My answer."),
        ];
        let (system, turns) = replay_transcript(&transcript);
        assert_eq!(system, "interviewer instructions");
        assert_eq!(turns.len(), 3);
        assert_eq!(turns[0].role, "user");
        assert_eq!(turns[1].role, "assistant");
        assert_eq!(turns[2].role, "user");
        assert_eq!(turns[2].content, "My answer.");
    }

    #[test]
    fn test_replayed_conversation_starts_with_user_turn() {
        // The transcript right after chat creation: the opening instruction
        // that produced the first question is not stored, so the replay must
        // restore it or the conversation would open on an assistant turn.
        let transcript = vec![
            message(1, MessageRole::System, "interviewer instructions"),
            message(2, MessageRole::Assistant, "Tell me about your experience."),
        ];
        let (_, turns) = replay_transcript(&transcript);
        assert_eq!(turns[0].role, "user");
        assert_eq!(turns[0].content, OPENING_PROMPT);
        assert_eq!(turns[1].role, "assistant");
    }

    #[test]
    fn test_replay_alternates_roles_over_full_exchange() {
        let transcript = vec![
            message(1, MessageRole::System, "instructions"),
            message(2, MessageRole::Assistant, "Q1"),
            message(3, MessageRole::User, "A1"),
            message(4, MessageRole::Assistant, "Q2"),
            message(5, MessageRole::User, "A2"),
        ];
        let (_, turns) = replay_transcript(&transcript);
        let roles: Vec<&str> = turns.iter().map(|t| t.role).collect();
        assert_eq!(roles, ["user", "assistant", "user", "assistant", "user"]);
    }

    #[test]
    fn test_replay_transcript_empty() {
        let (system, turns) = replay_transcript(&[]);
        assert!(system.is_empty());
        assert_eq!(turns.len(), 1);
        assert_eq!(turns[0].role, "user");
    }

    #[test]
    fn test_chat_response_flattens_chat_fields() {
        let chat = ChatRow {
            id: Uuid::new_v4(),
            application_id: Uuid::new_v4(),
            created_at: Utc::now(),
        };
        let response = ChatResponse {
            chat: chat.clone(),
            messages: vec![],
        };
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["id"], serde_json::json!(chat.id));
        assert!(value["messages"].as_array().unwrap().is_empty());
    }
}
