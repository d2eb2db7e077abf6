mod output;

use anyhow::{Context, Result, bail};
use prep_application::{Collaborators, InterviewService};
use prep_core::question::{CategoryMix, PlanRequest};
use prep_infrastructure::{AsyncDirSessionRepository, ConfigService};
use std::io::Read;
use std::path::Path;
use std::sync::Arc;

/// Parses `--mix 2,2,1`.
pub fn parse_mix(value: &str) -> std::result::Result<CategoryMix, String> {
    let weights: Vec<u32> = value
        .split(',')
        .map(|part| part.trim().parse::<u32>())
        .collect::<std::result::Result<_, _>>()
        .map_err(|e| format!("invalid weight in '{}': {}", value, e))?;

    match weights.as_slice() {
        [technical, behavioral, company_specific] => {
            Ok(CategoryMix::new(*technical, *behavioral, *company_specific))
        }
        _ => Err(format!(
            "expected three comma-separated weights (technical,behavioral,company), got '{}'",
            value
        )),
    }
}

pub struct App {
    service: InterviewService,
}

impl App {
    /// Loads the config, opens the session store and wires the built-in
    /// collaborators.
    pub async fn init(config_path: Option<&Path>, data_dir: Option<&Path>) -> Result<Self> {
        let config_service = match config_path {
            Some(path) => ConfigService::with_path(path),
            None => ConfigService::new()?,
        };
        let mut config = config_service
            .get_config()
            .with_context(|| format!("Failed to load {}", config_service.path().display()))?;
        if let Some(dir) = data_dir {
            config.data_dir = Some(dir.to_path_buf());
        }

        let repository = AsyncDirSessionRepository::default_location(&config)
            .await
            .context("Failed to open session store")?;
        tracing::debug!("Using session store at {}", repository.sessions_dir().display());

        let service = InterviewService::from_config(
            Arc::new(repository),
            Collaborators::built_in(),
            &config,
        );
        Ok(Self { service })
    }

    pub async fn new_session(
        &self,
        company: &str,
        role: &str,
        count: Option<u32>,
        mix: Option<CategoryMix>,
    ) -> Result<()> {
        let plan_request = match (count, mix) {
            (None, None) => None,
            (count, mix) => Some(PlanRequest::new(
                count.unwrap_or(prep_core::question::DEFAULT_QUESTION_COUNT),
                mix.unwrap_or_default(),
            )),
        };

        let session = self.service.create_session(company, role, plan_request).await?;
        println!("{}", session.id);
        Ok(())
    }

    pub async fn start(&self, session_id: &str) -> Result<()> {
        let session = self.service.start(session_id).await?;
        println!("{}", output::status_line(&session));
        for question in &session.questions {
            println!("{}", output::question_line(question));
        }
        Ok(())
    }

    pub async fn question(&self, session_id: &str) -> Result<()> {
        match self.service.current_question(session_id).await? {
            Some(question) => println!("{}", output::question_line(&question)),
            None => println!("No unanswered question"),
        }
        Ok(())
    }

    pub async fn answer(&self, session_id: &str, question_id: &str, text: &str) -> Result<()> {
        let text = if text == "-" {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .context("Failed to read answer from stdin")?;
            buffer
        } else {
            text.to_string()
        };
        if text.trim().is_empty() {
            bail!("answer text is empty");
        }

        let outcome = self
            .service
            .submit_answer(session_id, question_id, text.trim())
            .await?;
        if outcome.overwritten {
            println!("Replaced answer to {}", question_id);
        } else {
            println!("Recorded answer to {}", question_id);
        }

        let session = self.service.session(session_id).await?;
        match (&session.feedback, session.current_question()) {
            (Some(report), _) => print!("{}", output::feedback_report(report)),
            (None, Some(next)) => println!("Next: {}", output::question_line(next)),
            (None, None) => println!("{}", output::status_line(&session)),
        }
        Ok(())
    }

    pub async fn status(&self, session_id: &str) -> Result<()> {
        let session = self.service.session(session_id).await?;
        println!("{}", output::status_line(&session));
        if let Some(reason) = session.failure_reason() {
            println!("Reason: {}", reason);
        }
        Ok(())
    }

    pub async fn show(&self, session_id: &str) -> Result<()> {
        let session = self.service.session(session_id).await?;
        println!("{}", serde_json::to_string_pretty(&session)?);
        Ok(())
    }

    pub async fn retry_scoring(&self, session_id: &str) -> Result<()> {
        let session = self.service.retry_scoring(session_id).await?;
        if let Some(report) = &session.feedback {
            print!("{}", output::feedback_report(report));
        }
        Ok(())
    }

    pub async fn list(&self) -> Result<()> {
        for id in self.service.list_ids().await? {
            let session = self.service.session(&id).await?;
            println!("{}  {}", id, output::status_line(&session));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_mix() {
        assert_eq!(parse_mix("2,2,1").unwrap(), CategoryMix::new(2, 2, 1));
        assert_eq!(parse_mix(" 0, 3 ,0").unwrap(), CategoryMix::new(0, 3, 0));
        assert!(parse_mix("1,2").is_err());
        assert!(parse_mix("a,b,c").is_err());
    }

    #[tokio::test]
    async fn test_app_runs_a_session_end_to_end() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.toml");
        let data_dir = temp_dir.path().join("data");

        let app = App::init(Some(&config_path), Some(&data_dir)).await.unwrap();
        let session = app
            .service
            .create_session("Amazon", "Backend Engineer", Some(PlanRequest::new(2, CategoryMix::new(1, 1, 0))))
            .await
            .unwrap();

        app.start(&session.id).await.unwrap();
        app.answer(&session.id, "q1", "I would shard by customer id.").await.unwrap();
        app.answer(&session.id, "q2", "When I led the migration, we reduced costs by 20%.").await.unwrap();

        let status = app.service.status(&session.id).await.unwrap();
        assert_eq!(status, prep_core::session::SessionStatus::Completed);

        // A second process sees the same record
        let reopened = App::init(Some(&config_path), Some(&data_dir)).await.unwrap();
        assert_eq!(reopened.service.list_ids().await.unwrap(), vec![session.id.clone()]);
        assert!(reopened.service.session(&session.id).await.unwrap().feedback.is_some());
    }
}
