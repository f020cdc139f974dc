use crate::orientation::Orientation;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

/// One particle inside a backup: identity, orientation and head point.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticleRecord {
    pub id: u32,
    #[serde(rename = "o")]
    pub orientation: Orientation,
    pub x: usize,
    pub y: usize,
}

/// Flat, durable snapshot of a lattice.
///
/// Orientation + head point + the shared particle length determine every
/// occupied cell, so this is enough to rebuild the grid exactly. Field names
/// follow the compact `{s, l, ds, p}` layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LatticeBackup {
    /// Side length of the lattice.
    #[serde(rename = "s")]
    pub size: usize,
    /// Length shared by every particle.
    #[serde(rename = "l")]
    pub particle_length: usize,
    /// Completed diffusion steps at the time of the backup.
    #[serde(rename = "ds")]
    pub diffusion_steps: u64,
    /// Particles in placement order.
    #[serde(rename = "p")]
    pub particles: Vec<ParticleRecord>,
}

impl LatticeBackup {
    /// File stem for this backup, e.g. `S_128_P_12_STEP_400000`.
    pub fn file_stem(&self) -> String {
        format!(
            "S_{}_P_{}_STEP_{}",
            self.size, self.particle_length, self.diffusion_steps
        )
    }

    /// Writes the backup into `dir` using `format`, returning the file path.
    pub fn save_to_dir<P: AsRef<Path>>(&self, dir: P, format: BackupFormat) -> Result<PathBuf> {
        let path = dir
            .as_ref()
            .join(format!("{}.{}", self.file_stem(), format.extension()));
        self.save(&path, format)?;
        Ok(path)
    }

    /// Writes the backup to `path` using `format`.
    pub fn save<P: AsRef<Path>>(&self, path: P, format: BackupFormat) -> Result<()> {
        let path_ref = path.as_ref();
        let file = File::create(path_ref)
            .with_context(|| format!("Failed to create backup file '{}'", path_ref.display()))?;
        let mut writer = BufWriter::new(file);

        match format {
            BackupFormat::Json => serde_json::to_writer(&mut writer, self)
                .with_context(|| format!("Failed to write JSON backup '{}'", path_ref.display()))?,
            BackupFormat::Bincode => bincode::serialize_into(&mut writer, self)
                .with_context(|| format!("Failed to write bincode backup '{}'", path_ref.display()))?,
            BackupFormat::MessagePack => rmp_serde::encode::write(&mut writer, self)
                .with_context(|| format!("Failed to write MessagePack backup '{}'", path_ref.display()))?,
        }

        writer.flush()?;
        Ok(())
    }

    /// Reads a backup, picking the decoder from the file extension.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_ref = path.as_ref();
        let format = BackupFormat::from_path(path_ref).ok_or_else(|| {
            anyhow::anyhow!(
                "Cannot infer backup format of '{}' (expected .json, .bin or .msgpack)",
                path_ref.display()
            )
        })?;
        Self::load_as(path_ref, format)
    }

    /// Reads a backup encoded with `format`.
    pub fn load_as<P: AsRef<Path>>(path: P, format: BackupFormat) -> Result<Self> {
        let path_ref = path.as_ref();
        let file = File::open(path_ref)
            .with_context(|| format!("Failed to open backup file '{}'", path_ref.display()))?;
        let reader = BufReader::new(file);

        let backup = match format {
            BackupFormat::Json => serde_json::from_reader(reader)
                .with_context(|| format!("Failed to parse JSON backup '{}'", path_ref.display()))?,
            BackupFormat::Bincode => bincode::deserialize_from(reader)
                .with_context(|| format!("Failed to parse bincode backup '{}'", path_ref.display()))?,
            BackupFormat::MessagePack => rmp_serde::from_read(reader)
                .with_context(|| format!("Failed to parse MessagePack backup '{}'", path_ref.display()))?,
        };
        Ok(backup)
    }
}

/// Encodings available for backups. All of them carry the same flat record.
#[derive(Deserialize, Serialize, Debug, Copy, Clone, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum BackupFormat {
    #[default]
    Json,
    Bincode,
    MessagePack,
}

impl BackupFormat {
    pub fn extension(self) -> &'static str {
        match self {
            BackupFormat::Json => "json",
            BackupFormat::Bincode => "bin",
            BackupFormat::MessagePack => "msgpack",
        }
    }

    /// Detects the format from a file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()? {
            "json" => Some(BackupFormat::Json),
            "bin" => Some(BackupFormat::Bincode),
            "msgpack" => Some(BackupFormat::MessagePack),
            _ => None,
        }
    }
}

/// Result of one self-assembly check, as written to the statistics CSV.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssemblyRecord {
    pub step: u64,
    pub density: f64,
    pub horizontal_largest: usize,
    pub horizontal_total: usize,
    pub horizontal_ratio: Option<f64>, // None when no horizontal cells are occupied
    pub vertical_largest: usize,
    pub vertical_total: usize,
    pub vertical_ratio: Option<f64>,
    pub self_assembled: bool,
}
