//! End-to-end lint runs over the built-in catalogue.

use sqflint_core::{
    lint_file, lint_source, DiagnosticKind, InMemoryProvider, LintError, LintOptions, Registry,
    Report, Severity,
};
use std::collections::HashMap;
use std::path::Path;

fn lint_with(src: &str, options: &LintOptions) -> Report {
    let registry = Registry::builtin();
    let provider = InMemoryProvider::new(HashMap::new());
    lint_source(src, "mission/init.sqf", &registry, options, &provider)
}

fn lint(src: &str) -> Report {
    lint_with(src, &LintOptions::default())
}

#[test]
fn clean_script_has_no_findings() {
    let report = lint(
        r#"
        // spawn point for the player group
        private _spawn = getMarkerPos "respawn_west";
        params ["_unit", ["_delay", 5]];

        {
            _x setPos _spawn;
            _x setDamage 0;
        } forEach (units group _unit);

        for "_i" from 1 to 3 do {
            systemChat format ["wave %1", _i];
        };

        if (alive player) then {
            hint "ready";
        } else {
            sleep _delay;
        };
        "#,
    );
    assert!(report.errors().is_empty(), "{:?}", report.errors());
    assert!(report.warnings().is_empty(), "{:?}", report.warnings());
}

#[test]
fn commands_are_never_variables() {
    let report = lint("_pos = getPos player; hint str _pos;");
    assert!(report.variables().get("player").is_none());
    assert!(report.variables().get("getpos").is_none());
    assert!(report.variables().get("hint").is_none());
    assert_eq!(report.variables().len(), 1);
}

#[test]
fn magic_variables_and_macros_are_not_recorded() {
    let report = lint(
        "#define SPAWN_DELAY 5\n\
         { hint str [_x, _forEachIndex] } forEach _this;\n\
         sleep SPAWN_DELAY;\n\
         try { throw 1 } catch { hint str _exception };",
    );
    assert!(report.variables().is_empty(), "{:?}", report.variables());
    assert!(report.warnings().is_empty());
}

#[test]
fn comments_pair_with_definitions() {
    let report = lint(
        "/* first */ _count = 0;\n\
         _count = _count + 1;\n\
         // last\n\
         _count = 10;",
    );
    for record in report.variables().iter() {
        assert_eq!(record.comments().len(), record.definitions().len());
    }
    let record = report.variables().get("_count").unwrap();
    assert_eq!(record.definitions().len(), 3);
    assert_eq!(record.comment().unwrap().text, "/* first */");
}

#[test]
fn every_undefined_use_is_warned() {
    let report = lint("hint str _ghost;\nsleep _ghost;\n_a = [_ghost];");
    let warnings: Vec<_> = report
        .warnings()
        .iter()
        .filter(|w| w.message == "Possibly undefined variable _ghost")
        .collect();
    assert_eq!(warnings.len(), 3);
    let lines: Vec<_> = warnings.iter().map(|w| w.span.begin_line).collect();
    assert_eq!(lines, [1, 2, 3]);
    assert!(warnings.iter().all(|w| w.kind == DiagnosticKind::UndefinedLocal));
}

#[test]
fn macro_named_local_is_not_warned() {
    let report = lint("#define _helper 1\nhint str _helper;");
    assert!(report.warnings().is_empty());
}

#[test]
fn overloads_accumulate_in_custom_catalogue() {
    let registry = Registry::from_catalogue("u:foo SCALAR\nu:foo STRING\nn:true");
    let provider = InMemoryProvider::new(HashMap::new());
    let options = LintOptions::default();
    let ok = lint_source("foo 1; foo \"a\";", "t.sqf", &registry, &options, &provider);
    assert!(ok.errors().is_empty());
    let bad = lint_source("foo true;", "t.sqf", &registry, &options, &provider);
    assert_eq!(bad.errors().len(), 1);
    assert_eq!(bad.errors()[0].kind, DiagnosticKind::TypeMismatch);
}

#[test]
fn long_form_catalogue_lines_drive_type_checks() {
    let registry = Registry::from_catalogue("unary: foo scalar\nunary: foo string\nnoarg: true");
    let provider = InMemoryProvider::new(HashMap::new());
    let options = LintOptions::default();
    let ok = lint_source("foo 1; foo \"a\";", "t.sqf", &registry, &options, &provider);
    assert!(ok.errors().is_empty(), "{:?}", ok.errors());
    let bad = lint_source("foo true;", "t.sqf", &registry, &options, &provider);
    assert_eq!(bad.errors().len(), 1);
    assert_eq!(bad.errors()[0].kind, DiagnosticKind::TypeMismatch);
}

#[test]
fn builtin_catalogue_knows_common_binary_commands() {
    let report = lint(
        "params [\"_unit\", \"_veh\", \"_grp\"];\n\
         _unit setSkill 0.5;\n\
         _unit setSkill [\"aimingAccuracy\", 0.3];\n\
         _ok = _veh isKindOf \"Car\";\n\
         _inside = player inArea \"base\";\n\
         _veh lock true;\n\
         [_unit] joinSilent _grp;\n\
         _grp setGroupId [\"Alpha\"];\n\
         _veh setHitPointDamage [\"hitEngine\", 1];\n\
         _unit enableAI \"PATH\";\n\
         playSound3D [\"a3\\sounds_f\\alarm.wss\", _veh];\n\
         _rock = createSimpleObject [\"a3\\rocks_f\\rock.p3d\", getPosASL _unit];\n\
         hint str [_ok, _inside, _rock];",
    );
    assert!(report.errors().is_empty(), "{:?}", report.errors());
    assert!(report.warnings().is_empty(), "{:?}", report.warnings());
}

#[test]
fn syntax_errors_are_recovered() {
    let report = lint("_a = 1 2;\n_b = 3;\nhint _b ?;\n_c = 4;\nhint str [_b, _c];");
    let syntax: Vec<_> = report
        .errors()
        .iter()
        .filter(|e| e.kind == DiagnosticKind::SyntaxError)
        .collect();
    assert_eq!(syntax.len(), 2, "{syntax:?}");
    assert_eq!(syntax[1].message, "unexpected character '?'");
    assert!(report.variables().get("_c").is_some());
}

#[test]
fn strict_mode_reports_only_the_first_error() {
    let options = LintOptions {
        stop_on_error: true,
        ..LintOptions::default()
    };
    let report = lint_with("hint _undefined;\n_a = ;\n_b = ;\n_c = ;", &options);
    assert_eq!(report.errors().len(), 1);
    assert_eq!(report.errors()[0].kind, DiagnosticKind::SyntaxError);
    assert_eq!(report.errors()[0].span.begin_line, 2);
    assert!(report.warnings().is_empty());
}

#[test]
fn warnings_escalate_and_set_exit_code() {
    let options = LintOptions {
        warning_as_error: true,
        exit_code_enabled: true,
        ..LintOptions::default()
    };
    let report = lint_with("hint str _missing;", &options);
    assert!(report.warnings().is_empty());
    assert_eq!(report.errors().len(), 1);
    assert_eq!(report.errors()[0].severity, Severity::Error);
    assert_eq!(report.exit_code(options.exit_code_enabled), 1);

    let plain = lint("hint str _missing;");
    assert_eq!(plain.exit_code(true), 0);
}

#[test]
fn skip_warnings_drops_undefined_pass() {
    let options = LintOptions {
        skip_warnings: true,
        ..LintOptions::default()
    };
    let report = lint_with("hint str _missing;", &options);
    assert!(report.warnings().is_empty());
    assert!(report.errors().is_empty());
}

#[test]
fn path_checks_resolve_under_root() {
    let registry = Registry::builtin();
    let provider = InMemoryProvider::from_pairs([("/mission/scripts/present.sqf", "")]);
    let options = LintOptions {
        check_paths: true,
        root_path: Some("/mission".into()),
        ..LintOptions::default()
    };
    let report = lint_source(
        "[] execVM \"scripts\\present.sqf\";\n\
         _h = [] execVM \"scripts\\absent.sqf\";\n\
         _t = loadFile \"\\scripts\\present.sqf\";",
        "/mission/init.sqf",
        &registry,
        &options,
        &provider,
    );
    assert_eq!(report.errors().len(), 1, "{:?}", report.errors());
    assert_eq!(report.errors()[0].kind, DiagnosticKind::PathResolution);
    assert_eq!(report.errors()[0].span.begin_line, 2);
}

#[test]
fn includes_are_followed_for_macros() {
    let registry = Registry::builtin();
    let provider = InMemoryProvider::from_pairs([
        ("/mission/init.sqf", ""),
        ("/mission/macros.hpp", "#define GVAR(name) TAG_##name\n#define _shared 1"),
    ]);
    let report = lint_source(
        "#include \"macros.hpp\"\nGVAR(ready) = true;\nhint str _shared;",
        "/mission/init.sqf",
        &registry,
        &LintOptions::default(),
        &provider,
    );
    assert!(report.errors().is_empty(), "{:?}", report.errors());
    assert!(report.warnings().is_empty());
    assert_eq!(report.includes().len(), 1);
    assert_eq!(report.includes()[0].file, "macros.hpp");
    let names: Vec<_> = report.macros().map(|m| m.name.as_str()).collect();
    assert_eq!(names, ["GVAR", "_shared"]);
}

#[test]
fn lint_file_reads_through_provider() {
    let registry = Registry::builtin();
    let provider = InMemoryProvider::from_pairs([("/m/fn_test.sqf", "hint str _nope;")]);
    let report = lint_file(
        Path::new("/m/fn_test.sqf"),
        &registry,
        &LintOptions::default(),
        &provider,
    )
    .unwrap();
    assert_eq!(report.warnings().len(), 1);

    let err = lint_file(
        Path::new("/m/missing.sqf"),
        &registry,
        &LintOptions::default(),
        &provider,
    )
    .unwrap_err();
    assert!(matches!(err, LintError::Source { .. }));
}

#[test]
fn arity_errors_point_at_the_expression() {
    let report = lint("_p = player;\nsetPos [0, 0, 0];");
    assert_eq!(report.errors().len(), 1);
    let error = &report.errors()[0];
    assert_eq!(error.kind, DiagnosticKind::ArityMismatch);
    assert_eq!(error.span.begin_line, 2);
    assert_eq!(error.span.begin_column, 1);
}
