use super::destination::Destination;
use crate::config::Config;
use crate::tools::{CommandRunner, copy_file_synced, ensure_directory_exists, move_file};
use anyhow::{Context, Result};
use log::info;
use std::ffi::OsString;
use std::path::Path;

/// 依設定執行本機或遠端的複製／移動
pub struct TransferExecutor<'a> {
    config: &'a Config,
    runner: &'a dyn CommandRunner,
}

impl<'a> TransferExecutor<'a> {
    pub fn new(config: &'a Config, runner: &'a dyn CommandRunner) -> Self {
        Self { config, runner }
    }

    pub fn execute(&self, source: &Path, destination: &Destination) -> Result<()> {
        let copy = self.config.copy_mode;

        if self.config.dry_run {
            info!(
                "[DRY-RUN] Move: {} → {destination} (copy={copy})",
                source.display()
            );
            return Ok(());
        }

        match destination {
            Destination::Local { dir, file } => {
                ensure_directory_exists(dir)?;
                info!("Move: {} → {destination} (copy={copy})", source.display());
                if copy {
                    copy_file_synced(source, file)
                } else {
                    move_file(source, file)
                }
            }
            Destination::Remote { host, dir, .. } => {
                self.create_remote_dir(host, dir)?;
                info!("Move: {} → {destination} (copy={copy})", source.display());
                self.rsync(source, destination)
            }
        }
    }

    fn create_remote_dir(&self, host: &str, dir: &str) -> Result<()> {
        let args = [host, "mkdir", "-p", dir].map(OsString::from);
        self.runner
            .run("ssh", &args)
            .with_context(|| format!("failed to create remote dir {dir}"))
    }

    /// 非複製模式時由 rsync 在傳輸成功後刪除原檔
    fn rsync(&self, source: &Path, destination: &Destination) -> Result<()> {
        let target = destination
            .rsync_target()
            .context("rsync requires a remote destination")?;

        let mut args = vec![OsString::from("-aHAXv")];
        if !self.config.copy_mode {
            args.push(OsString::from("--remove-source-files"));
        }
        args.push(source.as_os_str().to_owned());
        args.push(OsString::from(target));

        self.runner
            .run("rsync", &args)
            .with_context(|| format!("failed to rsync {}", source.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DatePolicy, OutputTarget};
    use anyhow::bail;
    use std::fs;
    use std::path::PathBuf;
    use std::sync::Mutex;
    use tempfile::TempDir;

    #[derive(Default)]
    struct RecordingRunner {
        calls: Mutex<Vec<(String, Vec<String>)>>,
        fail_program: Option<&'static str>,
    }

    impl CommandRunner for RecordingRunner {
        fn run(&self, program: &str, args: &[OsString]) -> Result<()> {
            let args = args.iter().map(|a| a.to_string_lossy().into_owned()).collect();
            self.calls.lock().unwrap().push((program.to_string(), args));
            if self.fail_program == Some(program) {
                bail!("{program} failed");
            }
            Ok(())
        }
    }

    fn config(output: &str, copy_mode: bool, dry_run: bool) -> Config {
        Config {
            input_path: PathBuf::from("/input"),
            output: OutputTarget::classify(output),
            workers: 1,
            buffer: 1,
            copy_mode,
            dry_run,
            debug: false,
            date_policy: DatePolicy::default(),
        }
    }

    fn local_destination(root: &Path, name: &str) -> Destination {
        let dir = root.join("2023").join("05");
        Destination::Local {
            file: dir.join(name),
            dir,
        }
    }

    fn remote_destination(name: &str) -> Destination {
        Destination::Remote {
            host: "user@host".to_string(),
            dir: "/backup/2023/05".to_string(),
            file: format!("/backup/2023/05/{name}"),
        }
    }

    #[test]
    fn test_local_move() {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("photo.jpg");
        fs::write(&source, "img").unwrap();
        let out = temp_dir.path().join("out");

        let config = config(out.to_str().unwrap(), false, false);
        let runner = RecordingRunner::default();
        let destination = local_destination(&out, "photo.jpg");

        TransferExecutor::new(&config, &runner)
            .execute(&source, &destination)
            .unwrap();

        assert!(!source.exists());
        assert_eq!(fs::read_to_string(out.join("2023/05/photo.jpg")).unwrap(), "img");
        assert!(runner.calls.lock().unwrap().is_empty());
    }

    #[test]
    fn test_local_copy_keeps_source() {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("photo.jpg");
        fs::write(&source, "img").unwrap();
        let out = temp_dir.path().join("out");

        let config = config(out.to_str().unwrap(), true, false);
        let runner = RecordingRunner::default();

        TransferExecutor::new(&config, &runner)
            .execute(&source, &local_destination(&out, "photo.jpg"))
            .unwrap();

        assert!(source.exists());
        assert!(out.join("2023/05/photo.jpg").exists());
    }

    #[test]
    fn test_local_existing_target_is_overwritten() {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("photo.jpg");
        fs::write(&source, "new").unwrap();
        let out = temp_dir.path().join("out");
        fs::create_dir_all(out.join("2023/05")).unwrap();
        fs::write(out.join("2023/05/photo.jpg"), "old").unwrap();

        let config = config(out.to_str().unwrap(), false, false);
        let runner = RecordingRunner::default();
        TransferExecutor::new(&config, &runner)
            .execute(&source, &local_destination(&out, "photo.jpg"))
            .unwrap();

        assert_eq!(fs::read_to_string(out.join("2023/05/photo.jpg")).unwrap(), "new");
    }

    #[test]
    fn test_local_dry_run_touches_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("photo.jpg");
        fs::write(&source, "img").unwrap();
        let out = temp_dir.path().join("out");

        let config = config(out.to_str().unwrap(), false, true);
        let runner = RecordingRunner::default();
        TransferExecutor::new(&config, &runner)
            .execute(&source, &local_destination(&out, "photo.jpg"))
            .unwrap();

        assert!(source.exists());
        assert!(!out.exists());
    }

    #[test]
    fn test_remote_move_commands() {
        let config = config("user@host:/backup", false, false);
        let runner = RecordingRunner::default();

        TransferExecutor::new(&config, &runner)
            .execute(Path::new("/in/photo.jpg"), &remote_destination("photo.jpg"))
            .unwrap();

        let calls = runner.calls.lock().unwrap();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].0, "ssh");
        assert_eq!(calls[0].1, ["user@host", "mkdir", "-p", "/backup/2023/05"]);
        assert_eq!(calls[1].0, "rsync");
        assert_eq!(
            calls[1].1,
            [
                "-aHAXv",
                "--remove-source-files",
                "/in/photo.jpg",
                "user@host:/backup/2023/05/photo.jpg"
            ]
        );
    }

    #[test]
    fn test_remote_copy_keeps_source_flag_off() {
        let config = config("user@host:/backup", true, false);
        let runner = RecordingRunner::default();

        TransferExecutor::new(&config, &runner)
            .execute(Path::new("/in/photo.jpg"), &remote_destination("photo.jpg"))
            .unwrap();

        let calls = runner.calls.lock().unwrap();
        assert!(!calls[1].1.iter().any(|a| a == "--remove-source-files"));
    }

    #[test]
    fn test_remote_mkdir_failure_skips_rsync() {
        let config = config("user@host:/backup", false, false);
        let runner = RecordingRunner {
            fail_program: Some("ssh"),
            ..RecordingRunner::default()
        };

        let err = TransferExecutor::new(&config, &runner)
            .execute(Path::new("/in/photo.jpg"), &remote_destination("photo.jpg"))
            .unwrap_err();

        assert!(err.to_string().contains("failed to create remote dir"));
        assert_eq!(runner.calls.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_remote_dry_run_invokes_nothing() {
        let config = config("user@host:/backup", false, true);
        let runner = RecordingRunner::default();

        TransferExecutor::new(&config, &runner)
            .execute(Path::new("/in/photo.jpg"), &remote_destination("photo.jpg"))
            .unwrap();

        assert!(runner.calls.lock().unwrap().is_empty());
    }
}
