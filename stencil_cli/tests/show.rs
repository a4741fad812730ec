mod common;

use stencil_core::AnyEmptyResult;

#[test]
fn show_prints_raw_body() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_templates(
		&tmp.path().join("site.tpl"),
		&[("greet", "Hello, {{ name }}! {{> footer }}"), ("footer", "bye")],
	)?;

	common::stencil_cmd()
		.arg("show")
		.arg("greet")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::diff("Hello, {{ name }}! {{> footer }}\n"));

	Ok(())
}

#[test]
fn show_keeps_multiline_body_verbatim() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	std::fs::write(
		tmp.path().join("card.tpl"),
		"<%%STARTTEMPLATE card%%>\nName: {{ name }}\n  Role: {{ role }}\n<%%ENDTEMPLATE card%%>\n",
	)?;

	common::stencil_cmd()
		.arg("show")
		.arg("card")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::diff("Name: {{ name }}\n  Role: {{ role }}\n\n"));

	Ok(())
}

#[test]
fn show_missing_template_fails_with_diagnostic() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_templates(&tmp.path().join("site.tpl"), &[("greet", "hi")])?;

	common::stencil_cmd()
		.arg("show")
		.arg("nope")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.code(2)
		.stderr(predicates::str::contains("stencil::missing_template"))
		.stderr(predicates::str::contains(
			"template `nope` does not exist in the library",
		));

	Ok(())
}

#[test]
fn show_reports_unterminated_template() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	std::fs::write(
		tmp.path().join("broken.tpl"),
		"first line\n<%%STARTTEMPLATE open%%>\nnever closed\n",
	)?;

	common::stencil_cmd()
		.arg("show")
		.arg("open")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.code(2)
		.stderr(predicates::str::contains("stencil::source_file"))
		.stderr(predicates::str::contains(
			"no end marker found for template `open` (started on line 2)",
		));

	Ok(())
}
