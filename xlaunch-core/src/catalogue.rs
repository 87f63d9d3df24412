use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::Result;
use crate::release::RepoRef;
use crate::store::{read_json, write_json};

/// One catalogue row as persisted in `settings.json`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExperienceData {
    pub name: String,
    /// Folders under the build root that survive every cleanup.
    #[serde(default)]
    pub result_folders: Option<Vec<String>>,
    pub github_owner: String,
    pub github_repo: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github_token: Option<String>,
    /// Executable relative to the build root.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub executable_name: Option<String>,
    /// Logical name of the release asset to install; the first asset when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asset_name: Option<String>,
    #[serde(default)]
    pub image_urls: Option<Vec<String>>,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CatalogueFile {
    #[serde(default)]
    all_experiences_data: Vec<ExperienceData>,
}

/// A managed experience. The id is its position in the catalogue.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Experience {
    pub id: u32,
    pub name: String,
    pub result_folders: Vec<String>,
    pub source: RepoRef,
    pub executable: Option<PathBuf>,
    pub asset_name: Option<String>,
    pub image_urls: Vec<String>,
}

impl Experience {
    /// Id 0 is the launcher itself.
    pub fn is_launcher(&self) -> bool {
        self.id == 0
    }

    fn from_data(id: u32, d: &ExperienceData) -> Self {
        Self {
            id,
            name: d.name.clone(),
            result_folders: d.result_folders.clone().unwrap_or_default(),
            source: RepoRef {
                owner: d.github_owner.clone(),
                repo: d.github_repo.clone(),
                token: d.github_token.clone(),
            },
            executable: d.executable_name.as_ref().map(PathBuf::from),
            asset_name: d.asset_name.clone(),
            image_urls: d.image_urls.clone().unwrap_or_default(),
        }
    }
}

/// Append-only list of experiences, loaded once at startup.
#[derive(Debug)]
pub struct Catalogue {
    path: PathBuf,
    entries: Vec<ExperienceData>,
}

impl Catalogue {
    /// Loads the catalogue; when the file is missing, writes one holding only `launcher`.
    /// The flag tells whether the default was created.
    pub fn load_or_create(path: &Path, launcher: ExperienceData) -> Result<(Self, bool)> {
        if let Some(file) = read_json::<CatalogueFile>(path)? {
            info!(path = %path.display(), entries = file.all_experiences_data.len(), "catalogue loaded");
            return Ok((
                Self {
                    path: path.to_path_buf(),
                    entries: file.all_experiences_data,
                },
                false,
            ));
        }

        let cat = Self {
            path: path.to_path_buf(),
            entries: vec![launcher],
        };
        cat.save()?;
        Ok((cat, true))
    }

    pub fn save(&self) -> Result<()> {
        write_json(
            &self.path,
            &CatalogueFile {
                all_experiences_data: self.entries.clone(),
            },
        )
    }

    /// Appends and persists; returns the new id.
    pub fn push(&mut self, data: ExperienceData) -> Result<u32> {
        self.entries.push(data);
        self.save()?;
        Ok((self.entries.len() - 1) as u32)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, id: u32) -> Option<Experience> {
        self.entries
            .get(id as usize)
            .map(|d| Experience::from_data(id, d))
    }

    pub fn experiences(&self) -> Vec<Experience> {
        self.entries
            .iter()
            .enumerate()
            .map(|(i, d)| Experience::from_data(i as u32, d))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn launcher() -> ExperienceData {
        ExperienceData {
            name: "Launcher".into(),
            result_folders: None,
            github_owner: "acme".into(),
            github_repo: "launcher".into(),
            github_token: None,
            executable_name: None,
            asset_name: None,
            image_urls: None,
        }
    }

    #[test]
    fn missing_file_creates_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");

        let (cat, created) = Catalogue::load_or_create(&path, launcher()).unwrap();
        assert!(created);
        assert_eq!(cat.len(), 1);
        assert!(cat.get(0).unwrap().is_launcher());

        let (again, created) = Catalogue::load_or_create(&path, launcher()).unwrap();
        assert!(!created);
        assert_eq!(again.experiences(), cat.experiences());
    }

    #[test]
    fn reads_catalogue_with_nulls() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(
            &path,
            r#"{"allExperiencesData":[
                {"name":"Launcher","resultFolders":null,"githubOwner":"acme","githubRepo":"launcher","imageUrls":null},
                {"name":"Lab","resultFolders":["Results"],"githubOwner":"acme","githubRepo":"lab","executableName":"Lab.x86_64"}]}"#,
        )
        .unwrap();

        let (mut cat, _) = Catalogue::load_or_create(&path, launcher()).unwrap();
        let lab = cat.get(1).unwrap();
        assert_eq!(lab.result_folders, vec!["Results".to_string()]);
        assert_eq!(lab.executable, Some(PathBuf::from("Lab.x86_64")));
        assert!(cat.get(0).unwrap().result_folders.is_empty());

        let id = cat.push(launcher()).unwrap();
        assert_eq!(id, 2);
    }
}
