//! Saved Project Library
//!
//! Named snapshots of the editor fragments, persisted as one JSON array
//! under the `<prefix>_projects` key.

use chrono::Utc;

use crate::error::{Error, Result};
use crate::models::{Project, SourceBundle};
use crate::store::StoreHandle;

/// Persistent list of saved projects
#[derive(Debug)]
pub struct ProjectLibrary {
    store: StoreHandle,
    key: String,
    projects: Vec<Project>,
}

impl ProjectLibrary {
    /// Open the library stored under `key`
    pub fn open(store: StoreHandle, key: impl Into<String>) -> Self {
        let mut library = Self {
            store,
            key: key.into(),
            projects: Vec::new(),
        };
        library.reload();
        library
    }

    /// Re-read the persisted list; malformed data yields an empty list
    pub fn reload(&mut self) {
        self.projects = match self.store.get(&self.key) {
            Ok(Some(raw)) => match serde_json::from_str::<Vec<Project>>(&raw) {
                Ok(projects) => projects,
                Err(e) => {
                    warn!("Stored projects are malformed ({}), ignoring them", e);
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!("Failed to read stored projects: {}", e);
                Vec::new()
            }
        };
        debug!("Loaded {} saved projects", self.projects.len());
    }

    /// All projects in save order
    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    pub fn len(&self) -> usize {
        self.projects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }

    /// Name suggested for the next save
    pub fn default_name(&self) -> String {
        format!("Project {}", self.projects.len() + 1)
    }

    /// Snapshot `bundle` under `name`
    pub fn save(&mut self, name: &str, bundle: &SourceBundle) -> Result<Project> {
        if !bundle.has_content() {
            return Err(Error::EmptyProject);
        }
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::InvalidProjectName);
        }

        let project = Project::from_bundle(self.next_id(), name, bundle);
        let mut updated = self.projects.clone();
        updated.push(project.clone());
        self.commit(updated)?;
        info!("Saved project '{}' ({})", project.name, project.id);
        Ok(project)
    }

    /// Look up a project
    pub fn get(&self, id: i64) -> Result<&Project> {
        self.projects
            .iter()
            .find(|p| p.id == id)
            .ok_or(Error::ProjectNotFound { id })
    }

    /// Remove a project
    pub fn delete(&mut self, id: i64) -> Result<Project> {
        let index = self
            .projects
            .iter()
            .position(|p| p.id == id)
            .ok_or(Error::ProjectNotFound { id })?;
        let mut updated = self.projects.clone();
        let removed = updated.remove(index);
        self.commit(updated)?;
        info!("Deleted project '{}' ({})", removed.name, removed.id);
        Ok(removed)
    }

    /// Creation timestamp, bumped past the newest existing id
    fn next_id(&self) -> i64 {
        let now = Utc::now().timestamp_millis();
        match self.projects.iter().map(|p| p.id).max() {
            Some(max) if max >= now => max + 1,
            _ => now,
        }
    }

    /// Persist `projects`, adopting them only once the write succeeded
    fn commit(&mut self, projects: Vec<Project>) -> Result<()> {
        let json = serde_json::to_string(&projects)?;
        self.store.set(&self.key, &json)?;
        self.projects = projects;
        Ok(())
    }
}
