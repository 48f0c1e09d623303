//! Session creation pipeline.
//!
//! Flow: build_company_profile → generate_questions → SessionStore::create.
//! Research and generation degrade instead of failing, so only the store
//! write can fail this pipeline.

use tracing::info;

use crate::errors::AppError;
use crate::interview::questions::{generate_questions, PrepOptions};
use crate::llm_client::InferenceClient;
use crate::research::fetcher::PageFetcher;
use crate::research::profile::build_company_profile;
use crate::session::models::Session;
use crate::session::store::SessionStore;

pub async fn prepare_session(
    company: &str,
    role: &str,
    options: &PrepOptions,
    fetcher: &dyn PageFetcher,
    llm: &dyn InferenceClient,
    sessions: &SessionStore,
) -> Result<Session, AppError> {
    info!("Preparing session for {role} at {company}");

    let profile = build_company_profile(company, fetcher, llm).await;
    let questions = generate_questions(&profile, role, options, llm).await;

    Ok(sessions.create(company, role, profile, questions).await?)
}
