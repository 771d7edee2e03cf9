//! Termination signal tests
//!
//! Each test re-runs itself in a child process that signals itself, so the
//! test runner never receives the signal.

#[cfg(all(test, unix))]
mod signal_tests {
    use sectional::{ConfigManager, EncodingFormat, ManagerOptions, Record};
    use serde::{Deserialize, Serialize};
    use std::path::Path;
    use std::process::Command;
    use tempfile::TempDir;

    const CHILD_PATH_ENV: &str = "SECTIONAL_SIGNAL_TEST_PATH";

    #[derive(Debug, Clone, Default, Serialize, Deserialize)]
    struct WebServer {
        port: u16,
    }

    /// Build an autosaving manager, then SIGTERM this process before any `.await`
    fn run_child(path: &Path) {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();

        runtime.block_on(async {
            let options =
                ManagerOptions::new(EncodingFormat::Json, path).with_auto_save(true);
            let mut manager = ConfigManager::new(options).await.unwrap();
            manager
                .add_simple_section("web_server", Record::new(WebServer { port: 8080 }))
                .unwrap();

            let status = Command::new("kill")
                .args(["-TERM", &std::process::id().to_string()])
                .status()
                .unwrap();
            assert!(status.success());

            manager.take_autosave().unwrap().join().await;
        });
    }

    #[test]
    fn test_sigterm_right_after_build_is_saved() {
        if let Some(path) = std::env::var_os(CHILD_PATH_ENV) {
            run_child(Path::new(&path));
            return;
        }

        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("app.json");

        let status = Command::new(std::env::current_exe().unwrap())
            .args([
                "--exact",
                "signal_tests::test_sigterm_right_after_build_is_saved",
                "--test-threads=1",
            ])
            .env(CHILD_PATH_ENV, &path)
            .status()
            .unwrap();
        assert!(status.success(), "child exited with {status}");

        let saved: serde_json::Value =
            serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
        assert_eq!(saved["web_server"]["port"], 8080);
    }
}
