#![allow(dead_code)]

use std::path::{Path, PathBuf};

use git2::{IndexAddOption, Oid, Repository, Signature};

/// Write `<root>/<name>/<name>.toc` and one Lua file.
pub fn write_addon(root: &Path, name: &str, version: &str, deps: &[&str]) -> PathBuf {
    let dir = root.join(name);
    std::fs::create_dir_all(&dir).expect("Failed to create add-on dir");
    let mut toc = format!("## Interface: 100200\n## Title: {name}\n");
    if !version.is_empty() {
        toc.push_str(&format!("## Version: {version}\n"));
    }
    if !deps.is_empty() {
        toc.push_str(&format!("## Dependencies: {}\n", deps.join(", ")));
    }
    toc.push_str(&format!("\n{name}.lua\n"));
    std::fs::write(dir.join(format!("{name}.toc")), toc).expect("Failed to write manifest");
    std::fs::write(dir.join(format!("{name}.lua")), format!("-- {name}\n"))
        .expect("Failed to write source");
    dir
}

pub fn commit_all(repo: &Repository, message: &str) -> Oid {
    let mut index = repo.index().unwrap();
    index
        .add_all(["*"].iter(), IndexAddOption::DEFAULT, None)
        .unwrap();
    index.write().unwrap();
    let tree = repo.find_tree(index.write_tree().unwrap()).unwrap();
    let sig = Signature::now("Test User", "test@example.com").unwrap();
    let parent = repo
        .head()
        .ok()
        .and_then(|head| head.target())
        .map(|oid| repo.find_commit(oid).unwrap());
    let parents: Vec<&git2::Commit> = parent.iter().collect();
    repo.commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)
        .unwrap()
}

pub fn tag(repo: &Repository, name: &str, oid: Oid) {
    let object = repo.find_object(oid, None).unwrap();
    repo.tag_lightweight(name, &object, false).unwrap();
}

/// Library repository whose tagged revision carries `dependencies` as its
/// `.dependencies`; HEAD moves on without it.
pub fn library_repo(dir: &Path, tag_name: &str, dependencies: Option<&str>) -> Repository {
    std::fs::create_dir_all(dir).unwrap();
    let repo = Repository::init(dir).unwrap();
    std::fs::write(dir.join("Lib.lua"), "-- tagged").unwrap();
    if let Some(content) = dependencies {
        std::fs::write(dir.join(".dependencies"), content).unwrap();
    }
    let tagged = commit_all(&repo, "release");
    tag(&repo, tag_name, tagged);

    if dependencies.is_some() {
        std::fs::remove_file(dir.join(".dependencies")).unwrap();
        let mut index = repo.index().unwrap();
        index.remove_path(Path::new(".dependencies")).unwrap();
        index.write().unwrap();
    }
    std::fs::write(dir.join("Lib.lua"), "-- head").unwrap();
    commit_all(&repo, "work in progress");
    repo
}

/// Zip entry names in archive order.
pub fn zip_entries(path: &Path) -> Vec<String> {
    let file = std::fs::File::open(path).expect("Failed to open archive");
    let archive = zip::ZipArchive::new(file).expect("Failed to read archive");
    archive.file_names().map(str::to_string).collect()
}
