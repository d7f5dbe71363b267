//! Administrator console view state.
//!
//! Every function here is a pure transformation: it takes the current state
//! and returns the next one. Callers apply them only after the matching
//! remote write has been confirmed.

use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::application::{Application, ApplicationStatus};
use crate::ids::{ApplicationId, JobId};
use crate::job::Job;

/// Applications loaded per job. Buckets are never invalidated.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ApplicationCache {
    buckets: BTreeMap<JobId, Vec<Application>>,
}

impl ApplicationCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, job_id: &JobId) -> Option<&[Application]> {
        self.buckets.get(job_id).map(Vec::as_slice)
    }

    pub fn contains(&self, job_id: &JobId) -> bool {
        self.buckets.contains_key(job_id)
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Cache with `applications` stored for `job_id`.
    pub fn with_bucket(mut self, job_id: JobId, applications: Vec<Application>) -> Self {
        self.buckets.insert(job_id, applications);
        self
    }

    /// Cache where the application with `id` carries `status`.
    ///
    /// Every loaded bucket is searched; records other than `id` are left
    /// untouched. An unknown id yields an unchanged cache.
    pub fn with_status(self, id: &ApplicationId, status: ApplicationStatus) -> Self {
        let buckets = self
            .buckets
            .into_iter()
            .map(|(job_id, apps)| {
                let apps = apps
                    .into_iter()
                    .map(|app| {
                        if &app.id == id {
                            app.with_status(status)
                        } else {
                            app
                        }
                    })
                    .collect();
                (job_id, apps)
            })
            .collect();
        Self { buckets }
    }

    /// Find a cached application by id across all buckets.
    pub fn find(&self, id: &ApplicationId) -> Option<&Application> {
        self.buckets.values().flatten().find(|app| &app.id == id)
    }
}

/// Job list without `job_id`.
pub fn without_job(jobs: Vec<Job>, job_id: &JobId) -> Vec<Job> {
    jobs.into_iter().filter(|job| &job.id != job_id).collect()
}
