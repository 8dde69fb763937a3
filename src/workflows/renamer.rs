use rustyline::DefaultEditor;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::domain::meta::UploadMeta;
use crate::workflows::naming::{media_extension, with_original_extension};

/// Where `src` should land inside `dest_dir`, and the bare name it gets.
/// Files keep their extension when the preferred name lacks it.
pub fn build_dest_path(src: &Path, dest_dir: &Path, meta: &UploadMeta) -> (PathBuf, String) {
    let fallback = src
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| meta.name.clone());

    let target = match meta.preferred_scene_name.as_deref().map(str::trim) {
        Some(preferred) if !preferred.is_empty() => {
            if src.is_dir() {
                preferred.to_string()
            } else {
                with_original_extension(preferred, Some(src))
            }
        }
        _ => fallback,
    };

    (dest_dir.join(&target), target)
}

pub fn find_unique_filename(old_path: &Path, directory: &Path, base_filename: &str) -> PathBuf {
    let mut path = directory.join(base_filename);
    let mut counter = 1;

    // Folder names like "Movie.2160p.Remux" have no extension to preserve.
    let base = Path::new(base_filename);
    let extension = media_extension(base);
    let stem = match extension {
        Some(_) => base
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(base_filename),
        None => base_filename,
    };

    while path.exists() && path != old_path {
        let new_filename = match extension {
            Some(extension) => format!("{stem} [copy {counter}].{extension}"),
            None => format!("{stem} [copy {counter}]"),
        };
        path = directory.join(new_filename);
        counter += 1;
    }

    path
}

pub fn confirm_rename(old_path: &Path, new_path: &Path) -> Result<bool> {
    println!(
        "Rename \"{}\" -> \"{}\"? [y/N] ",
        display_name(old_path),
        display_name(new_path)
    );

    let mut rl = DefaultEditor::new()?;
    loop {
        let input = rl.readline("").unwrap_or_default();
        let input = input.trim().to_lowercase();

        if input == "y" || input == "yes" {
            return Ok(true);
        } else if input == "n" || input == "no" || input.is_empty() {
            return Ok(false);
        } else {
            println!("Please enter 'y' or 'n'.");
        }
    }
}

/// Returns whether the path was actually moved.
pub fn rename_file(old_path: &Path, new_path: &Path, skip_confirm: bool) -> Result<bool> {
    if old_path == new_path {
        println!("Already named correctly.");
        return Ok(false);
    }
    if !skip_confirm && !confirm_rename(old_path, new_path)? {
        println!("Skipped.");
        return Ok(false);
    }

    fs::rename(old_path, new_path)?;
    log::info!("Renamed {old_path:?} -> {new_path:?}");
    println!("Renamed successfully.");
    Ok(true)
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use tempfile::TempDir;

    fn meta_preferring(name: &str) -> UploadMeta {
        UploadMeta {
            preferred_scene_name: Some(name.into()),
            ..UploadMeta::new("Original.Movie.2160p.mkv")
        }
    }

    #[test]
    fn test_build_dest_path_adds_file_extension() {
        let temp_dir = TempDir::new().unwrap();
        let tracker_dir = temp_dir.path().join("TRACKER");
        let src = temp_dir.path().join("Original.Movie.2160p.mkv");
        File::create(&src).unwrap();

        let meta = meta_preferring("Movie.Scene.Name.2160p.UHD");
        let (dest_path, target) = build_dest_path(&src, &tracker_dir, &meta);

        assert_eq!(target, "Movie.Scene.Name.2160p.UHD.mkv");
        assert_eq!(dest_path, tracker_dir.join("Movie.Scene.Name.2160p.UHD.mkv"));
    }

    #[test]
    fn test_build_dest_path_keeps_existing_extension() {
        let temp_dir = TempDir::new().unwrap();
        let src = temp_dir.path().join("Original.Movie.2160p.mkv");
        File::create(&src).unwrap();

        let meta = meta_preferring("Movie.Scene.Name.2160p.UHD.mkv");
        let (_, target) = build_dest_path(&src, temp_dir.path(), &meta);

        assert_eq!(target, "Movie.Scene.Name.2160p.UHD.mkv");
    }

    #[test]
    fn test_build_dest_path_directory_uses_preferred_name() {
        let temp_dir = TempDir::new().unwrap();
        let src_dir = temp_dir.path().join("Original.Movie.2160p");
        fs::create_dir_all(src_dir.join("BDMV")).unwrap();

        let meta = meta_preferring("Movie.Scene.Name.2160p.UHD.BluRay.Remux");
        let (dest_path, target) = build_dest_path(&src_dir, temp_dir.path(), &meta);

        assert_eq!(target, "Movie.Scene.Name.2160p.UHD.BluRay.Remux");
        assert_eq!(dest_path, temp_dir.path().join(&target));
    }

    #[test]
    fn test_build_dest_path_without_preferred_name() {
        let temp_dir = TempDir::new().unwrap();
        let src = temp_dir.path().join("source").join("Original.Movie.2160p.mkv");

        let meta = UploadMeta::new("Original.Movie.2160p.mkv");
        let (dest_path, target) = build_dest_path(&src, temp_dir.path(), &meta);

        assert_eq!(target, "Original.Movie.2160p.mkv");
        assert_eq!(dest_path, temp_dir.path().join("Original.Movie.2160p.mkv"));
    }

    #[test]
    fn test_find_unique_filename_no_conflict() {
        let temp_dir = TempDir::new().unwrap();
        let dir_path = temp_dir.path();
        let old_path = dir_path.join("original.mkv");
        let base_filename = "Movie.Scene.Name.mkv";

        let unique_path = find_unique_filename(&old_path, dir_path, base_filename);
        assert_eq!(unique_path, dir_path.join(base_filename));
    }

    #[test]
    fn test_find_unique_filename_with_conflict() {
        let temp_dir = TempDir::new().unwrap();
        let dir_path = temp_dir.path();
        let old_path = dir_path.join("original.mkv");
        let base_filename = "Movie.Scene.Name.mkv";

        File::create(dir_path.join(base_filename)).unwrap();

        let unique_path = find_unique_filename(&old_path, dir_path, base_filename);
        assert_eq!(unique_path, dir_path.join("Movie.Scene.Name [copy 1].mkv"));

        File::create(dir_path.join("Movie.Scene.Name [copy 1].mkv")).unwrap();
        let unique_path_2 = find_unique_filename(&old_path, dir_path, base_filename);
        assert_eq!(unique_path_2, dir_path.join("Movie.Scene.Name [copy 2].mkv"));
    }

    #[test]
    fn test_find_unique_filename_directory_target() {
        let temp_dir = TempDir::new().unwrap();
        let dir_path = temp_dir.path();
        let old_path = dir_path.join("Original.Movie.2160p");
        fs::create_dir(dir_path.join("Movie.Remux")).unwrap();

        let unique_path = find_unique_filename(&old_path, dir_path, "Movie.Remux");
        assert_eq!(unique_path, dir_path.join("Movie.Remux [copy 1]"));
    }

    #[test]
    fn test_find_unique_filename_same_file() {
        let temp_dir = TempDir::new().unwrap();
        let dir_path = temp_dir.path();
        let filename = "Movie.Scene.Name.mkv";
        let old_path = dir_path.join(filename);

        // Renaming a path onto itself is not a conflict.
        File::create(&old_path).unwrap();

        let unique_path = find_unique_filename(&old_path, dir_path, filename);
        assert_eq!(unique_path, old_path);
    }

    #[test]
    fn test_rename_file_without_confirmation() {
        let temp_dir = TempDir::new().unwrap();
        let old_path = temp_dir.path().join("Original.Movie.2160p.mkv");
        let new_path = temp_dir.path().join("Movie.Scene.Name.mkv");
        File::create(&old_path).unwrap();

        assert!(rename_file(&old_path, &new_path, true).unwrap());
        assert!(!old_path.exists());
        assert!(new_path.exists());

        assert!(!rename_file(&new_path, &new_path, true).unwrap());
    }
}
