//! Response bodies of the AppVeyor REST API, reduced to the fields we read.

use serde::Deserialize;

/// `GET /projects/{account}/{slug}`
#[derive(Debug, Deserialize)]
pub(crate) struct ProjectResponse {
    pub build: Build,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Build {
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub jobs: Vec<Job>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Job {
    pub job_id: String,
    #[serde(default)]
    pub artifacts_count: Option<u32>,
}

impl Job {
    /// Jobs that report no artifacts are not worth a request.
    /// A missing count is treated as unknown.
    pub fn may_have_artifacts(&self) -> bool {
        self.artifacts_count.is_none_or(|count| count > 0)
    }
}

/// One element of `GET /buildjobs/{jobId}/artifacts`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Artifact {
    pub file_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_project_response() {
        let body = r#"{
            "project": { "projectId": 42, "slug": "coredns-custom-build" },
            "build": {
                "buildId": 7,
                "version": "1.0.123",
                "status": "success",
                "jobs": [
                    { "jobId": "abc", "name": "Environment: linux", "status": "success", "artifactsCount": 3 },
                    { "jobId": "def", "name": "Environment: docs", "status": "success", "artifactsCount": 0 },
                    { "jobId": "ghi", "status": "running" }
                ]
            }
        }"#;

        let response: ProjectResponse = serde_json::from_str(body).unwrap();

        assert_eq!(response.build.version.as_deref(), Some("1.0.123"));
        let eligible: Vec<_> = response
            .build
            .jobs
            .iter()
            .filter(|j| j.may_have_artifacts())
            .map(|j| j.job_id.as_str())
            .collect();
        assert_eq!(eligible, ["abc", "ghi"]);
    }

    #[test]
    fn test_decode_artifacts() {
        let body = r#"[
            { "fileName": "coredns-linux-amd64.zip", "name": "linux", "type": "Zip", "size": 1024 },
            { "fileName": "dist/coredns-windows-amd64.zip", "type": "Zip", "size": 2048 }
        ]"#;

        let artifacts: Vec<Artifact> = serde_json::from_str(body).unwrap();

        assert_eq!(artifacts.len(), 2);
        assert_eq!(artifacts[1].file_name, "dist/coredns-windows-amd64.zip");
    }

    #[test]
    fn test_decode_build_without_jobs() {
        let response: ProjectResponse = serde_json::from_str(r#"{"build": {}}"#).unwrap();
        assert!(response.build.jobs.is_empty());
    }
}
