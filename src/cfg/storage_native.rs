use directories::ProjectDirs;
use std::{
    fs::OpenOptions,
    io::{self, Read, Write},
    path::{Path, PathBuf},
    sync::LazyLock,
};

use thiserror::Error;

static PROJECT_DIRS: LazyLock<Option<ProjectDirs>> =
    LazyLock::new(|| ProjectDirs::from("io.github", "landing-page", "landing_page"));
static CONFIG_PATH: LazyLock<Option<PathBuf>> = LazyLock::new(|| {
    PROJECT_DIRS
        .as_ref()
        .map(|dir| dir.config_dir().join("preferences.toml"))
});

fn get_table(path: &Path) -> toml::Table {
    let Ok(mut file) = OpenOptions::new().read(true).open(path) else {
        return toml::Table::new();
    };

    let mut string = String::new();
    let Ok(_) = file.read_to_string(&mut string) else {
        return toml::Table::new();
    };

    toml::from_str(&string).unwrap_or_default()
}

pub(super) fn save(key: &str, value: &str) -> Result<(), SaveError> {
    let path = CONFIG_PATH.as_ref().ok_or(SaveError::NoSaveDirectory)?;
    save_to(path, key, value)
}

pub(super) fn load(key: &str) -> Option<String> {
    load_from(CONFIG_PATH.as_ref()?, key)
}

fn save_to(path: &Path, key: &str, value: &str) -> Result<(), SaveError> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).map_err(SaveError::CreateConfigDir)?;
    }
    let tmp_path = path.with_extension("toml.tmp");

    let mut table = get_table(path);
    table.insert(key.to_string(), toml::Value::String(value.to_string()));
    let table_string = toml::to_string(&table)?;

    let mut tmp_file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(&tmp_path)
        .map_err(SaveError::OpenTmpFile)?;
    tmp_file
        .write_all(table_string.as_bytes())
        .map_err(SaveError::Write)?;
    tmp_file.flush().map_err(SaveError::Write)?;
    drop(tmp_file);

    std::fs::rename(&tmp_path, path).map_err(SaveError::Rename)
}

fn load_from(path: &Path, key: &str) -> Option<String> {
    match get_table(path).remove(key)? {
        toml::Value::String(s) => Some(s),
        _ => None,
    }
}

#[derive(Debug, Error)]
pub enum SaveError {
    #[error("no reasonable save directory was found")]
    NoSaveDirectory,
    #[error("CreateConfigDir: {0}")]
    CreateConfigDir(io::Error),
    #[error("StringifyTable: {0}")]
    StringifyTable(#[from] toml::ser::Error),
    #[error("OpenTmpFile: {0}")]
    OpenTmpFile(io::Error),
    #[error("Write: {0}")]
    Write(io::Error),
    #[error("Rename: {0}")]
    Rename(io::Error),
}
