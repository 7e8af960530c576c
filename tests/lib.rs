extern crate assert_cmd;
extern crate predicates;
extern crate tempfile;

#[cfg(test)]
mod tests {
    use assert_cmd::Command;
    use predicates::prelude::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn main_cmd(dir: &TempDir) -> Command {
        let mut cmd = Command::cargo_bin("vdir").unwrap();
        cmd.env_remove("RUST_LOG")
            .env_remove("DATABASE_FILENAME")
            .arg("--db")
            .arg(database_path(dir));
        cmd
    }

    fn database_path(dir: &TempDir) -> PathBuf {
        dir.path().join("data").join("vdir.db")
    }

    fn cmd_success(dir: &TempDir, args: Vec<&str>) {
        main_cmd(dir).args(args).assert().success();
    }

    fn cmd_should_print(dir: &TempDir, args: Vec<&str>, expected: &str) {
        main_cmd(dir)
            .args(args)
            .assert()
            .success()
            .stdout(predicate::str::contains(expected));
    }

    fn cmd_should_fail(dir: &TempDir, args: Vec<&str>, expected_code: &str) {
        main_cmd(dir)
            .args(args)
            .assert()
            .failure()
            .stderr(predicate::str::contains(expected_code));
    }

    fn listed_names(dir: &TempDir, parent_name: &str) -> Vec<String> {
        let assert = main_cmd(dir).arg("list").arg(parent_name).assert().success();
        let output = String::from_utf8(assert.get_output().stdout.clone()).unwrap();

        output
            .lines()
            .filter(|line| !line.ends_with("is empty"))
            .filter_map(|line| line.split_whitespace().nth(1))
            .map(|name| name.to_string())
            .collect()
    }

    #[test]
    fn database_is_created_on_first_use() {
        let dir = tempfile::tempdir().unwrap();

        cmd_should_print(&dir, vec!["create", "root", "folder"], "Created folder 'root'");
        assert!(database_path(&dir).exists());

        cmd_should_print(&dir, vec!["show", "root"], "(root level)");
    }

    #[test]
    fn database_location_from_the_environment() {
        let dir = tempfile::tempdir().unwrap();
        let legacy_path = dir.path().join("legacy").join("app.db");
        let vdir_path = dir.path().join("vdir").join("app.db");

        Command::cargo_bin("vdir")
            .unwrap()
            .env_remove("RUST_LOG")
            .env_remove("VDIR_DATABASE")
            .env("DATABASE_FILENAME", &legacy_path)
            .args(vec!["create", "root", "folder"])
            .assert()
            .success();
        assert!(legacy_path.exists());

        // VDIR_DATABASE wins over DATABASE_FILENAME.
        Command::cargo_bin("vdir")
            .unwrap()
            .env_remove("RUST_LOG")
            .env("VDIR_DATABASE", &vdir_path)
            .env("DATABASE_FILENAME", &legacy_path)
            .args(vec!["create", "other", "folder"])
            .assert()
            .success();
        assert!(vdir_path.exists());

        cmd_should_fail(&dir, vec!["show", "root"], "NODE_NOT_FOUND");
    }

    #[test]
    fn sample_tree_through_the_cli() {
        let dir = tempfile::tempdir().unwrap();
        cmd_success(&dir, vec!["create", "root", "folder"]);
        cmd_success(&dir, vec!["create", "projects", "folder", "root"]);
        cmd_success(&dir, vec!["create", "2025", "folder", "projects"]);
        cmd_success(&dir, vec!["create", "README.md", "file", "2025"]);

        assert_eq!(listed_names(&dir, "projects"), vec!["2025"]);

        cmd_should_print(
            &dir,
            vec!["move", "README.md", "projects"],
            "Moved 'README.md' into 'projects'",
        );
        cmd_should_print(
            &dir,
            vec!["rename", "2025", "archive"],
            "Renamed '2025' to 'archive'",
        );
        assert_eq!(listed_names(&dir, "projects"), vec!["README.md", "archive"]);

        cmd_should_print(&dir, vec!["remove", "projects"], "(3 nodes)");
        cmd_should_print(&dir, vec!["list", "root"], "'root' is empty");
    }

    #[test]
    fn rejections_are_reported_with_their_code() {
        let dir = tempfile::tempdir().unwrap();
        cmd_success(&dir, vec!["create", "root", "folder"]);
        cmd_success(&dir, vec!["create", "level1", "folder", "root"]);
        cmd_success(&dir, vec!["create", "level2", "folder", "level1"]);
        cmd_success(&dir, vec!["create", "notes.txt", "file", "root"]);

        cmd_should_fail(
            &dir,
            vec!["move", "level1", "level2"],
            "CANNOT_MOVE_INTO_DESCENDANT",
        );
        cmd_should_fail(
            &dir,
            vec!["create", "x", "file", "notes.txt"],
            "PARENT_NOT_FOLDER",
        );
        cmd_should_fail(&dir, vec!["create", "level2", "file"], "DUPLICATE_NAME");
        cmd_should_fail(&dir, vec!["list", "missing"], "PARENT_NOT_FOUND");
        cmd_should_fail(&dir, vec!["remove", "missing"], "NODE_NOT_FOUND");
        cmd_should_fail(&dir, vec!["rename", "root", "root"], "NAME_UNCHANGED");

        // Only the accepted commands changed the tree.
        assert_eq!(listed_names(&dir, "root"), vec!["level1", "notes.txt"]);
        assert_eq!(listed_names(&dir, "level1"), vec!["level2"]);
    }

    #[test]
    fn unknown_node_types_are_refused() {
        let dir = tempfile::tempdir().unwrap();

        main_cmd(&dir)
            .args(vec!["create", "x", "symlink"])
            .assert()
            .failure();
    }

    #[test]
    fn deep_chain_removal() {
        let dir = tempfile::tempdir().unwrap();
        cmd_success(&dir, vec!["create", "root", "folder"]);
        cmd_success(&dir, vec!["create", "l1", "folder", "root"]);
        cmd_success(&dir, vec!["create", "l2", "folder", "l1"]);
        cmd_success(&dir, vec!["create", "l3", "folder", "l2"]);
        cmd_success(&dir, vec!["create", "l4", "folder", "l3"]);
        cmd_success(&dir, vec!["create", "l5", "folder", "l4"]);

        cmd_success(&dir, vec!["remove", "l3"]);
        assert_eq!(listed_names(&dir, "root").len(), 1);
        assert_eq!(listed_names(&dir, "l1").len(), 1);

        cmd_success(&dir, vec!["remove", "l1"]);
        assert!(listed_names(&dir, "root").is_empty());
        cmd_should_fail(&dir, vec!["show", "l5"], "NODE_NOT_FOUND");
    }

    #[test]
    fn interactive_shell() {
        let dir = tempfile::tempdir().unwrap();

        main_cmd(&dir)
            .arg("shell")
            .write_stdin(
                "create root folder\n\
                 create docs folder root\n\
                 create docs folder root\n\
                 list root\n\
                 exit\n\
                 create never folder\n",
            )
            .assert()
            .success()
            .stdout(predicate::str::contains("Created folder 'docs'"))
            .stdout(predicate::str::contains("folder docs"))
            .stdout(predicate::str::contains("Exiting..."))
            .stderr(predicate::str::contains("DUPLICATE_NAME"));

        // The shell stopped at 'exit' and kept the state of the commands before.
        assert_eq!(listed_names(&dir, "root"), vec!["docs"]);
        cmd_should_fail(&dir, vec!["show", "never"], "NODE_NOT_FOUND");
    }
}
