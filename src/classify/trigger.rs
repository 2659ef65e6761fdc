//! Classification Trigger
//!
//! Glue between incident creation and the classifier. Jobs are submitted
//! fire-and-forget once the incident row exists, drained by a background
//! worker, and the derived label is written back onto the incident.
//! Failures are logged and never reach the creation response.

use std::sync::Arc;

use anyhow::Context;
use sqlx::SqlitePool;
use tokio::sync::{mpsc, Semaphore};
use uuid::Uuid;

use super::types::Category;
use super::Classifier;
use crate::models::Incident;

/// Unit of classification work, captured at incident creation.
#[derive(Debug, Clone)]
pub struct ClassifyJob {
    pub incident_id: Uuid,
    pub description: String,
}

/// Submission handle for the classification worker.
#[derive(Clone)]
pub struct ClassifyQueue {
    tx: mpsc::Sender<ClassifyJob>,
}

impl ClassifyQueue {
    /// Submit a job without blocking and without failing the caller.
    ///
    /// A full or closed queue is logged and the job dropped; the incident
    /// then stays uncategorized, which is an acceptable terminal state.
    pub fn submit(&self, job: ClassifyJob) {
        if let Err(err) = self.tx.try_send(job) {
            let reason = match &err {
                mpsc::error::TrySendError::Full(_) => "queue full",
                mpsc::error::TrySendError::Closed(_) => "worker stopped",
            };
            let job = err.into_inner();
            tracing::warn!(
                "Classification job for incident {} dropped ({}); incident stays uncategorized",
                job.incident_id,
                reason
            );
        }
    }
}

/// Start the background classification worker and return its submission
/// handle.
///
/// Each job runs as its own task so incidents classify concurrently, with
/// at most `concurrency` in flight. The worker owns the classifier; no
/// ordering exists across incidents, only create-before-update per
/// incident (jobs are submitted after the insert returns).
pub fn spawn_worker(
    pool: SqlitePool,
    classifier: Arc<Classifier>,
    queue_size: usize,
    concurrency: usize,
) -> ClassifyQueue {
    let (tx, mut rx) = mpsc::channel::<ClassifyJob>(queue_size);
    let semaphore = Arc::new(Semaphore::new(concurrency));

    tokio::spawn(async move {
        while let Some(job) = rx.recv().await {
            let permit = match semaphore.clone().acquire_owned().await {
                Ok(permit) => permit,
                Err(_) => break,
            };
            let pool = pool.clone();
            let classifier = classifier.clone();

            tokio::spawn(async move {
                let incident_id = job.incident_id;
                if let Err(e) = classify_and_store(&pool, &classifier, job).await {
                    tracing::error!("Classification failed for incident {}: {:#}", incident_id, e);
                }
                drop(permit);
            });
        }
        tracing::debug!("Classification worker shutting down");
    });

    ClassifyQueue { tx }
}

/// Classify a description and write the label back onto its incident.
///
/// Runs after the creation response has been sent. The write touches only
/// `category` (and `updated_at`); an incident deleted in the meantime is
/// reported as an error rather than silently ignored.
pub async fn classify_and_store(
    pool: &SqlitePool,
    classifier: &Classifier,
    job: ClassifyJob,
) -> anyhow::Result<Category> {
    let category = classifier
        .classify(&job.description)
        .await
        .context("classifier backend failed")?;

    let updated = Incident::set_category(pool, job.incident_id, category)
        .await
        .context("category write-back failed")?;

    if !updated {
        anyhow::bail!("incident {} no longer exists", job.incident_id);
    }

    tracing::debug!("Incident {} classified as {}", job.incident_id, category);
    Ok(category)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::{KeywordClassifier, ZeroShotClassifier};
    use crate::db::test_pool;
    use crate::models::CreateIncident;
    use std::time::Duration;

    fn keyword() -> Classifier {
        Classifier::Keyword(KeywordClassifier)
    }

    /// A backend that always fails: nothing listens on the discard port.
    fn unreachable_zero_shot() -> Classifier {
        Classifier::ZeroShot(ZeroShotClassifier::new(
            "http://127.0.0.1:9/classify".to_string(),
            Duration::from_secs(1),
        ))
    }

    async fn insert_incident(pool: &SqlitePool, title: &str, description: &str) -> Incident {
        Incident::create(
            pool,
            CreateIncident {
                title: title.to_string(),
                description: description.to_string(),
            },
        )
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn test_classify_and_store_sets_category() {
        let pool = test_pool().await;
        let incident = insert_incident(&pool, "Portal login", "Cannot login to portal").await;
        assert_eq!(incident.category, None);

        let job = ClassifyJob {
            incident_id: incident.id,
            description: incident.description.clone(),
        };
        let category = classify_and_store(&pool, &keyword(), job).await.unwrap();
        assert_eq!(category, Category::LoginIssue);

        let stored = Incident::find_by_id(&pool, incident.id).await.unwrap().unwrap();
        assert_eq!(stored.category.as_deref(), Some("Login Issue"));
    }

    #[tokio::test]
    async fn test_failing_backend_leaves_incident_untouched() {
        let pool = test_pool().await;
        let incident = insert_incident(&pool, "Outage", "Network is down").await;

        let job = ClassifyJob {
            incident_id: incident.id,
            description: incident.description.clone(),
        };
        let result = classify_and_store(&pool, &unreachable_zero_shot(), job).await;
        assert!(result.is_err());

        // The record survives the failure, still uncategorized.
        let stored = Incident::find_by_id(&pool, incident.id).await.unwrap().unwrap();
        assert_eq!(stored.title, "Outage");
        assert_eq!(stored.description, "Network is down");
        assert_eq!(stored.category, None);
    }

    #[tokio::test]
    async fn test_missing_incident_is_reported() {
        let pool = test_pool().await;

        let job = ClassifyJob {
            incident_id: Uuid::new_v4(),
            description: "Network is down".to_string(),
        };
        let err = classify_and_store(&pool, &keyword(), job).await.unwrap_err();
        assert!(err.to_string().contains("no longer exists"));
    }

    #[tokio::test]
    async fn test_worker_classifies_submitted_jobs() {
        let pool = test_pool().await;
        let queue = spawn_worker(pool.clone(), Arc::new(keyword()), 16, 2);

        let incident = insert_incident(&pool, "Outage", "Network is down").await;
        queue.submit(ClassifyJob {
            incident_id: incident.id,
            description: incident.description.clone(),
        });

        let mut category = None;
        for _ in 0..100 {
            category = Incident::find_by_id(&pool, incident.id)
                .await
                .unwrap()
                .unwrap()
                .category;
            if category.is_some() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert_eq!(category.as_deref(), Some("Network Issue"));
    }

    #[tokio::test]
    async fn test_submit_never_fails_the_caller() {
        // Capacity-1 channel with no worker draining it.
        let (tx, mut rx) = mpsc::channel::<ClassifyJob>(1);
        let queue = ClassifyQueue { tx };

        let job = |n: u32| ClassifyJob {
            incident_id: Uuid::new_v4(),
            description: format!("job {}", n),
        };

        queue.submit(job(1));
        queue.submit(job(2)); // queue full: logged and dropped, no panic

        assert_eq!(rx.try_recv().unwrap().description, "job 1");
        assert!(rx.try_recv().is_err());
    }
}
