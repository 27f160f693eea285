//! Import command implementation.
//!
//! The import command:
//! 1. Checks the token may import into the project
//! 2. Creates a capture file and separator token
//! 3. Runs the test command with recording enabled
//! 4. Makes sure something was recorded
//! 5. Resolves (or creates) the branch
//! 6. Creates a revision on it
//! 7. Uploads the capture file
//! 8. Completes the revision
//!
//! Every step runs after the previous one finished and the first failure
//! ends the run. Nothing created remotely is rolled back.

use super::models::{CompletionOutcome, ImportArgs, ImportReport, ImportState};
use crate::api::{ApiClient, Branch, CassetteApi, Revision};
use crate::capture::{generate_separator_with, CaptureFile};
use crate::events::{EventSink, ImportEvent, Status, Step};
use crate::runner::{CommandRunner, ShellRunner};
use crate::utils::config::{BULK_FILE_PATH_ENV, BULK_FILE_SEPARATOR_ENV, RECORDING_ENV};
use crate::utils::error::{ApiError, CaptureError, ImportError};
use log::{debug, info};
use rand::rngs::ThreadRng;
use rand::Rng;
use std::time::Instant;

/// Drives one or more import runs against an API and a command runner
pub struct Importer<'a, A, R, G = ThreadRng> {
    api: &'a A,
    runner: &'a R,
    rng: G,
    state: ImportState,
}

impl<'a, A, R> Importer<'a, A, R, ThreadRng>
where
    A: CassetteApi,
    R: CommandRunner,
{
    pub fn new(api: &'a A, runner: &'a R) -> Self {
        Self {
            api,
            runner,
            rng: rand::rng(),
            state: ImportState::Init,
        }
    }
}

impl<'a, A, R, G> Importer<'a, A, R, G>
where
    A: CassetteApi,
    R: CommandRunner,
    G: Rng,
{
    /// Use `rng` for separator tokens instead of the thread RNG
    pub fn with_rng<H: Rng>(self, rng: H) -> Importer<'a, A, R, H> {
        Importer {
            api: self.api,
            runner: self.runner,
            rng,
            state: self.state,
        }
    }

    /// Last state reached by the most recent run
    pub fn state(&self) -> ImportState {
        self.state
    }

    /// Execute the full import workflow
    ///
    /// Progress goes to `sink`; the first failing step is reported there
    /// as a `Failed` event and returned as the error.
    pub fn run(
        &mut self,
        args: &ImportArgs,
        sink: &mut dyn EventSink,
    ) -> Result<ImportReport, ImportError> {
        let start_time = Instant::now();
        self.state = ImportState::Init;

        info!(
            "Importing into project {} branch {}",
            args.project_id, args.branch_name
        );

        self.check_permission(args, sink)?;
        let (capture, separator) = self.prepare_capture(sink)?;
        self.run_command(args, &capture, &separator, sink)?;
        let bytes_uploaded = self.validate_capture(&capture, sink)?;
        let branch = self.resolve_branch(args, sink)?;
        let revision = self.create_revision(args, &branch, sink)?;
        self.upload(args, &capture, &revision, sink)?;
        let outcome = self.complete(args, &revision, sink)?;

        let report = ImportReport {
            project_id: args.project_id,
            branch,
            revision,
            bytes_uploaded,
            outcome,
        };

        let event = match outcome {
            CompletionOutcome::Created => ImportEvent::new(
                Step::Complete,
                Status::Succeeded,
                format!("Created new revision {}", report.revision_path()),
            ),
            CompletionOutcome::Unchanged => ImportEvent::new(
                Step::Complete,
                Status::Info,
                format!(
                    "No changes detected on branch {}, no new revision was created.",
                    report.branch.name
                ),
            ),
            CompletionOutcome::Queued => ImportEvent::new(
                Step::Complete,
                Status::Info,
                "Revision creation has been queued and will be finished in a few seconds. \
                 A new revision will only be created if there are changes.",
            ),
        };
        sink.event(event);

        debug!(
            "Import finished in {:.2}s",
            start_time.elapsed().as_secs_f64()
        );

        Ok(report)
    }

    fn check_permission(
        &mut self,
        args: &ImportArgs,
        sink: &mut dyn EventSink,
    ) -> Result<(), ImportError> {
        sink.event(ImportEvent::new(
            Step::PermissionCheck,
            Status::Started,
            "Checking project write permission",
        ));

        match self.api.can_import(args.project_id) {
            Ok(true) => {}
            Ok(false) => {
                debug!("Sanity check did not grant can_import");
                return Err(denied(sink, args.project_id, None));
            }
            Err(e) => return Err(denied(sink, args.project_id, Some(e))),
        }

        sink.event(ImportEvent::new(
            Step::PermissionCheck,
            Status::Succeeded,
            "Project write permission check successful",
        ));
        self.state = ImportState::PermissionChecked;
        Ok(())
    }

    fn prepare_capture(
        &mut self,
        sink: &mut dyn EventSink,
    ) -> Result<(CaptureFile, String), ImportError> {
        let capture = CaptureFile::create()
            .map_err(|e| fail(sink, Step::CaptureSetup, ImportError::CaptureSetup(e)))?;
        let separator = generate_separator_with(&mut self.rng);

        sink.event(ImportEvent::new(
            Step::CaptureSetup,
            Status::Succeeded,
            format!("Created import file at: {}", capture.path().display()),
        ));
        self.state = ImportState::CaptureReady;
        Ok((capture, separator))
    }

    fn run_command(
        &mut self,
        args: &ImportArgs,
        capture: &CaptureFile,
        separator: &str,
        sink: &mut dyn EventSink,
    ) -> Result<(), ImportError> {
        sink.event(ImportEvent::new(
            Step::RunCommand,
            Status::Started,
            format!("Running command: \"{}\"", args.command),
        ));

        let env = recording_env(capture, separator);
        let verbose = args.verbose;
        let result = self.runner.run(&args.command, &env, &mut |chunk: &[u8]| {
            if verbose {
                sink.output(chunk);
            }
        });
        result.map_err(|e| fail(sink, Step::RunCommand, ImportError::Subprocess(e)))?;

        sink.event(ImportEvent::new(
            Step::RunCommand,
            Status::Succeeded,
            "Test run succeeded.",
        ));
        self.state = ImportState::SubprocessDone;
        Ok(())
    }

    fn validate_capture(
        &mut self,
        capture: &CaptureFile,
        sink: &mut dyn EventSink,
    ) -> Result<u64, ImportError> {
        let size = capture.validate_non_empty().map_err(|e| {
            let err = match e {
                CaptureError::Empty => ImportError::CaptureEmpty,
                other => ImportError::CaptureRead(other),
            };
            fail(sink, Step::ValidateCapture, err)
        })?;

        sink.event(ImportEvent::new(
            Step::ValidateCapture,
            Status::Succeeded,
            format!("Recorded {} bytes of request transactions", size),
        ));
        self.state = ImportState::CaptureValidated;
        Ok(size)
    }

    fn resolve_branch(
        &mut self,
        args: &ImportArgs,
        sink: &mut dyn EventSink,
    ) -> Result<Branch, ImportError> {
        sink.event(ImportEvent::new(
            Step::ResolveBranch,
            Status::Started,
            format!("Resolving branch {}", args.branch_name),
        ));

        let project = self.api.fetch_project(args.project_id).map_err(|source| {
            fail(
                sink,
                Step::ResolveBranch,
                ImportError::ProjectLookup {
                    project_id: args.project_id,
                    source,
                },
            )
        })?;
        let project_name = if project.name.is_empty() {
            args.project_id.to_string()
        } else {
            project.name
        };

        let mut branch = self
            .api
            .upsert_branch(args.project_id, &args.branch_name)
            .map_err(|source| {
                fail(
                    sink,
                    Step::ResolveBranch,
                    ImportError::BranchResolution {
                        project_name: project_name.clone(),
                        source,
                    },
                )
            })?;

        if branch.name.is_empty() {
            branch.name = args.branch_name.clone();
        }

        debug!("Branch {} has id {}", branch.name, branch.id);
        sink.event(ImportEvent::new(
            Step::ResolveBranch,
            Status::Succeeded,
            format!("Using branch {} in project {}", branch.name, project_name),
        ));
        self.state = ImportState::BranchResolved;
        Ok(branch)
    }

    fn create_revision(
        &mut self,
        args: &ImportArgs,
        branch: &Branch,
        sink: &mut dyn EventSink,
    ) -> Result<Revision, ImportError> {
        sink.event(ImportEvent::new(
            Step::CreateRevision,
            Status::Started,
            format!("Creating new revision for branch {}", args.branch_name),
        ));

        let revision = self
            .api
            .create_revision(&branch.id, args.revision_name.as_deref())
            .map_err(|source| {
                fail(
                    sink,
                    Step::CreateRevision,
                    ImportError::RevisionCreation {
                        branch_name: branch.name.clone(),
                        source,
                    },
                )
            })?;

        sink.event(ImportEvent::new(
            Step::CreateRevision,
            Status::Succeeded,
            format!("Created a new revision for branch {}", args.branch_name),
        ));
        self.state = ImportState::RevisionCreated;
        Ok(revision)
    }

    fn upload(
        &mut self,
        args: &ImportArgs,
        capture: &CaptureFile,
        revision: &Revision,
        sink: &mut dyn EventSink,
    ) -> Result<(), ImportError> {
        sink.event(ImportEvent::new(
            Step::Upload,
            Status::Started,
            "Importing request transactions to cassette",
        ));

        let contents = capture
            .read_contents()
            .map_err(|e| fail(sink, Step::Upload, ImportError::CaptureRead(e)))?;

        self.api
            .upload_request_transactions(&revision.id, contents)
            .map_err(|source| {
                fail(
                    sink,
                    Step::Upload,
                    ImportError::Upload {
                        revision_id: revision.id.clone(),
                        branch_name: args.branch_name.clone(),
                        source,
                    },
                )
            })?;

        sink.event(ImportEvent::new(
            Step::Upload,
            Status::Succeeded,
            "Imported request transactions to cassette.",
        ));
        self.state = ImportState::Uploaded;
        Ok(())
    }

    fn complete(
        &mut self,
        args: &ImportArgs,
        revision: &Revision,
        sink: &mut dyn EventSink,
    ) -> Result<CompletionOutcome, ImportError> {
        let completed = self.api.complete_revision(&revision.id).map_err(|source| {
            fail(
                sink,
                Step::Complete,
                ImportError::Completion {
                    revision_id: revision.id.clone(),
                    branch_name: args.branch_name.clone(),
                    source,
                },
            )
        })?;

        self.state = ImportState::Completed;
        Ok(match completed.created_new_revision {
            Some(true) => CompletionOutcome::Created,
            Some(false) => CompletionOutcome::Unchanged,
            None => CompletionOutcome::Queued,
        })
    }
}

/// Report a failed step and hand the error back
fn fail(sink: &mut dyn EventSink, step: Step, err: ImportError) -> ImportError {
    sink.event(ImportEvent::new(step, Status::Failed, err.to_string()));
    err
}

fn denied(sink: &mut dyn EventSink, project_id: u64, source: Option<ApiError>) -> ImportError {
    fail(
        sink,
        Step::PermissionCheck,
        ImportError::PermissionDenied { project_id, source },
    )
}

/// Variables telling the instrumented test run where to record
fn recording_env(capture: &CaptureFile, separator: &str) -> Vec<(String, String)> {
    vec![
        (RECORDING_ENV.to_string(), "1".to_string()),
        (
            BULK_FILE_PATH_ENV.to_string(),
            capture.path().to_string_lossy().into_owned(),
        ),
        (BULK_FILE_SEPARATOR_ENV.to_string(), separator.to_string()),
    ]
}

/// Execute the import command against the real API and shell
///
/// **Public** - main entry point called from main.rs
pub fn execute_import(
    args: &ImportArgs,
    sink: &mut dyn EventSink,
) -> Result<ImportReport, ImportError> {
    let api = ApiClient::new(&args.api_url, &args.project_access_token)
        .map_err(|e| fail(sink, Step::PermissionCheck, ImportError::Client(e)))?;
    let runner = ShellRunner::new();

    Importer::new(&api, &runner).run(args, sink)
}

/// Validate import arguments
///
/// **Public** - can be called before execute_import for early validation
pub fn validate_args(args: &ImportArgs) -> anyhow::Result<()> {
    if args.api_url.is_empty() {
        anyhow::bail!("API URL cannot be empty");
    }

    if !args.api_url.starts_with("http://") && !args.api_url.starts_with("https://") {
        anyhow::bail!("API URL must start with http:// or https://");
    }

    if args.project_access_token.trim().is_empty() {
        anyhow::bail!("Project access token cannot be empty");
    }

    if args.branch_name.trim().is_empty() {
        anyhow::bail!("Branch name cannot be empty");
    }

    if args.command.trim().is_empty() {
        anyhow::bail!("Command cannot be empty");
    }

    Ok(())
}
