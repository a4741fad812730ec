mod common;

use stencil_core::AnyEmptyResult;

#[test]
fn list_prints_names_in_load_order() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_templates(
		&tmp.path().join("site.tpl"),
		&[("header", "# {{ title }}"), ("footer", "-- {{ site }}")],
	)?;

	common::stencil_cmd()
		.arg("list")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::diff("header\nfooter\n"));

	Ok(())
}

#[test]
fn list_without_config_only_reads_root_tpl_files() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_templates(&tmp.path().join("root.tpl"), &[("root", "r")])?;
	common::write_templates(&tmp.path().join("nested/inner.tpl"), &[("inner", "i")])?;
	common::write_templates(&tmp.path().join("notes.txt"), &[("notes", "n")])?;

	common::stencil_cmd()
		.arg("list")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::diff("root\n"));

	Ok(())
}

#[test]
fn list_reports_empty_project() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;

	common::stencil_cmd()
		.arg("list")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::is_empty())
		.stderr(predicates::str::contains("No templates found."));

	Ok(())
}

#[test]
fn list_fails_on_duplicate_names_by_default() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_templates(&tmp.path().join("a.tpl"), &[("dup", "A")])?;
	common::write_templates(&tmp.path().join("b.tpl"), &[("dup", "B")])?;

	common::stencil_cmd()
		.arg("list")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.code(2)
		.stderr(predicates::str::contains("failed to load templates from `b.tpl`"));

	Ok(())
}

#[test]
fn list_duplicates_flag_allows_repeated_names() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_templates(&tmp.path().join("a.tpl"), &[("first", "1"), ("dup", "A")])?;
	common::write_templates(&tmp.path().join("b.tpl"), &[("dup", "B"), ("last", "2")])?;

	common::stencil_cmd()
		.arg("list")
		.arg("--duplicates")
		.arg("ignore")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::diff("first\ndup\nlast\n"));

	Ok(())
}

#[test]
fn list_rejects_unknown_duplicates_value() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;

	common::stencil_cmd()
		.arg("list")
		.arg("--duplicates")
		.arg("merge")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.failure()
		.stderr(predicates::str::contains("invalid value 'merge'"));

	Ok(())
}

#[test]
fn missing_subcommand_exits_with_one() {
	common::stencil_cmd()
		.assert()
		.code(1)
		.stderr(predicates::str::contains("No subcommand specified"));
}
