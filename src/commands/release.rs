//! Release command implementation
//!
//! One pipeline, two modes: plan-only (--dry-run) and execute. Both modes
//! compute the full plan; execute then applies it. All decisions are made on
//! the plan before the first mutation, so the dry-run report shows exactly
//! what an execute run would do against the same repository state.

use crate::core::config::ForkConfig;
use crate::core::error::{ForkResult, ResultExt};
use crate::core::vcs::{CommitDetail, SystemGit};
use crate::release::apply::{StagedRelease, refresh_lockfile};
use crate::release::base::resolve_base;
use crate::release::commits::categorize;
use crate::release::plan::{ReleasePlan, ReleaseRequest};
use crate::release::probe::RepositoryProbe;
use std::env;

/// Run the release command
pub fn run_release(version: &str, push: bool, dry_run: bool) -> ForkResult<()> {
  let request = ReleaseRequest::new(version, push, dry_run)?;

  let cwd = env::current_dir().context("Failed to get current directory")?;
  let git = SystemGit::open(&cwd)?;
  let config = ForkConfig::load(git.work_tree())?;

  let plan = build_plan(&git, &config, request)?;

  println!("{}", plan.to_human_readable());

  if plan.request.dry_run {
    println!("🔍 Dry-run mode (no changes applied)");
    return Ok(());
  }

  execute_plan(&git, &config, &plan)
}

/// Probe the repository and compute the full release plan (read-only)
fn build_plan(git: &SystemGit, config: &ForkConfig, request: ReleaseRequest) -> ForkResult<ReleasePlan> {
  let probe = RepositoryProbe::new(git, config);
  let tag_name = request.version.tag_name(&config.tag_prefix);

  println!("🚀 Planning release {}", tag_name);

  probe.assert_clean_tree(request.dry_run)?;

  // Fetch refreshes remote-tracking refs, which a dry run must not touch;
  // the remote duplicate check below uses read-only ls-remote either way.
  if !request.dry_run {
    println!("📡 Fetching {} and {}...", config.fork_remote, config.upstream_remote);
    probe.fetch_remotes();
  }

  let local_tags = git.list_tags()?;
  let remote_tags = probe.remote_tags();
  probe.assert_tag_available(&tag_name, &local_tags, &remote_tags)?;

  let upstream_ref = config.upstream_ref();
  let merge_base = git.merge_base("HEAD", &upstream_ref)?;
  let base = resolve_base(&local_tags, &config.tag_prefix, merge_base.as_deref(), &upstream_ref)?;
  println!("📍 Changelog base: {} ({})", base.reference, base.origin);

  let shas = git.rev_list_range(&base.reference)?;
  let details: Vec<CommitDetail> = shas
    .iter()
    .map(|sha| git.commit_detail(sha))
    .collect::<ForkResult<_>>()?;
  let commits = categorize(&details, &config.excluded_paths, &config.sync_marker);
  println!("📜 {} commits since base", details.len());

  let branch = git.current_branch()?;
  let head = git.head_commit()?;
  let upstream_head = git.short_hash(&upstream_ref)?;
  let date = chrono::Utc::now().format("%Y-%m-%d").to_string();

  Ok(ReleasePlan::build(request, config, branch, head, base, commits, upstream_head, date))
}

/// Apply a computed plan: write files, commit, tag, optionally push
fn execute_plan(git: &SystemGit, config: &ForkConfig, plan: &ReleasePlan) -> ForkResult<()> {
  let staged = StagedRelease::stage(git.work_tree(), config, plan)?;

  // First mutation happens here. git has no multi-file transaction, so a
  // failure past this point leaves the tree partially modified; point the
  // user at the cleanup instead of attempting a rollback.
  let result = apply_staged(git, config, plan, &staged);
  if result.is_err() {
    eprintln!();
    eprintln!("⚠️  The release did not complete; the repository may be partially modified.");
    eprintln!("   Review `git status` and `git tag --list '{}'`, then reset what you", plan.tag_name);
    eprintln!("   don't want before retrying.");
  }
  result
}

fn apply_staged(git: &SystemGit, config: &ForkConfig, plan: &ReleasePlan, staged: &StagedRelease) -> ForkResult<()> {
  println!("📝 Updating {} and {}...", config.manifest_path.display(), config.changelog_path.display());
  staged.write()?;

  let lockfile = git.work_tree().join("Cargo.lock");
  let lockfile_refreshed = lockfile.exists() && refresh_lockfile(git.work_tree());

  let manifest = git.work_tree().join(&config.manifest_path);
  let changelog = git.work_tree().join(&config.changelog_path);
  let mut paths = vec![manifest.as_path(), changelog.as_path()];
  if lockfile_refreshed {
    paths.push(lockfile.as_path());
  }

  println!("📦 Committing release {}...", plan.tag_name);
  git.commit_paths(&paths, &plan.commit_message())?;

  println!("🏷️  Tagging {}...", plan.tag_name);
  git.create_annotated_tag(&plan.tag_name, &plan.tag_message())?;
  if !git.verify_tag(&plan.tag_name)? {
    return Err(format!("Tag '{}' was not created", plan.tag_name).into());
  }

  if plan.request.push {
    println!("⬆️  Pushing {} and {} to {}...", plan.branch, plan.tag_name, config.fork_remote);
    git.push_release(&config.fork_remote, &plan.branch, &plan.tag_name)?;
  }

  println!();
  println!("✅ Released {}", plan.tag_name);
  if !plan.request.push {
    println!();
    println!("Next steps:");
    println!("  git push {} {} refs/tags/{}", config.fork_remote, plan.branch, plan.tag_name);
  }

  Ok(())
}
