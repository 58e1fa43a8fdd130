//! End-to-end tests driving the `mlst-solver` binary over temporary input trees.

use std::io::Write;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const OXFORD_LOCI: [&str; 7] = [
    "Oxf_gltA", "Oxf_gyrB", "Oxf_gdhB", "Oxf_recA", "Oxf_cpn60", "Oxf_gpi", "Oxf_rpoD",
];
const PASTEUR_LOCI: [&str; 7] = [
    "Pas_cpn60", "Pas_fusA", "Pas_gltA", "Pas_pyrG", "Pas_recA", "Pas_rplB", "Pas_rpoB",
];

const ST208: [&str; 7] = ["1", "3", "3", "2", "2", "97", "3"];

struct Fixture {
    _root: TempDir,
    hits: std::path::PathBuf,
    profiles: std::path::PathBuf,
}

fn hit_lines(loci: &[&str], alleles: &[&str], skip: &[&str]) -> String {
    loci.iter()
        .zip(alleles)
        .filter(|(l, _)| !skip.contains(l))
        .map(|(l, a)| format!("contig_1\t{l}_{a}\t100.0\t500\t500\t500\t1\t500\t1\t500\t924\t0.0\n"))
        .collect()
}

fn write_table(path: &Path, loci: &[&str], rows: &[(&str, &[&str], &str)]) {
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    let mut text = format!("ST\t{}\tclonal_complex\tspecies\n", loci.join("\t"));
    for (st, alleles, cc) in rows {
        text.push_str(&format!(
            "{st}\t{}\t{cc}\tA. baumannii\n",
            alleles.join("\t")
        ));
    }
    std::fs::write(path, text).unwrap();
}

/// AB01 is fully typed by both schemes; AB02 lacks `Oxf_gpi` and has no Pasteur hits.
fn fixture() -> Fixture {
    let root = tempfile::tempdir().unwrap();
    let hits = root.path().join("hits");
    let profiles = root.path().join("db");
    std::fs::create_dir_all(&hits).unwrap();

    write_table(
        &profiles.join("Oxford/profiles_oxford.csv"),
        &OXFORD_LOCI,
        &[
            ("208", &ST208, "CC92"),
            ("231", &["1", "3", "3", "2", "2", "96", "3"], "CC92"),
            ("1417", &["1", "12", "3", "2", "2", "97", "3"], ""),
        ],
    );
    write_table(
        &profiles.join("Pasteur/profiles_pasteur.csv"),
        &PASTEUR_LOCI,
        &[("2", &["2"; 7], "CC2")],
    );

    std::fs::write(
        hits.join("AB01.oxford_vs_query.b6"),
        hit_lines(&OXFORD_LOCI, &ST208, &[]),
    )
    .unwrap();
    std::fs::write(
        hits.join("AB01.pasteur_vs_query.b6"),
        hit_lines(&PASTEUR_LOCI, &["2"; 7], &[]),
    )
    .unwrap();
    std::fs::write(
        hits.join("AB02.oxford_vs_query.b6"),
        hit_lines(&OXFORD_LOCI, &ST208, &["Oxf_gpi"]),
    )
    .unwrap();

    Fixture {
        _root: root,
        hits,
        profiles,
    }
}

fn type_cmd(f: &Fixture) -> Command {
    let mut cmd = Command::cargo_bin("mlst-solver").unwrap();
    cmd.arg("type")
        .arg("--hits")
        .arg(&f.hits)
        .arg("--profiles")
        .arg(&f.profiles);
    cmd
}

#[test]
fn test_text_report() {
    let f = fixture();
    type_cmd(&f)
        .assert()
        .success()
        .stdout(predicate::str::contains("Sample: AB01"))
        .stdout(predicate::str::contains("Oxford: ST-208 (exact, 7/7 loci)"))
        .stdout(predicate::str::contains("Pasteur: ST-2 (exact, 7/7 loci)"))
        .stdout(predicate::str::contains("Oxford: ST-208 (partial, 6/7 loci)"))
        .stdout(predicate::str::contains("97 (predicted"))
        .stdout(predicate::str::contains("Also consistent: ST-231"))
        .stdout(predicate::str::contains("Pasteur: not typed"));
}

#[test]
fn test_tsv_summary() {
    let f = fixture();
    type_cmd(&f)
        .args(["--format", "tsv"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with(
            "Sample\tOxford_ST\tOxford_CC\tOxford_Species\tPasteur_ST",
        ))
        .stdout(predicate::str::contains(
            "AB01\tST-208\tCC92\tA. baumannii\tST-2\tCC2\tA. baumannii\tComplete",
        ))
        .stdout(predicate::str::contains(
            "AB02\tST-208\tCC92\tA. baumannii\tN/A\tN/A\tN/A\tIncomplete",
        ));
}

#[test]
fn test_json_report() {
    let f = fixture();
    let output = type_cmd(&f)
        .args(["--format", "json", "--threads", "2"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert!(json["generated_at"].is_string());
    assert_eq!(json["min_genes_required"], 5);
    assert_eq!(json["schemes"], serde_json::json!(["oxford", "pasteur"]));

    let samples = json["samples"].as_array().unwrap();
    assert_eq!(samples.len(), 2);
    let ab01_oxford = &samples[0]["results"][0];
    assert_eq!(ab01_oxford["outcome"], "typed");
    assert_eq!(ab01_oxford["st"], "208");
    assert_eq!(ab01_oxford["confidence"], "exact");

    let ab02_pasteur = &samples[1]["results"][1];
    assert_eq!(ab02_pasteur["outcome"], "failed");
    assert!(ab02_pasteur["reason"]
        .as_str()
        .unwrap()
        .contains("AB02.pasteur_vs_query.b6"));
}

#[test]
fn test_allele_profiles_output() {
    let f = fixture();
    type_cmd(&f)
        .args(["--scheme", "oxford", "--format", "profiles"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with(
            "Sample\tOxf_gltA\tOxf_gyrB\tOxf_gdhB\tOxf_recA\tOxf_cpn60\tOxf_gpi\tOxf_rpoD\n",
        ))
        .stdout(predicate::str::contains("AB01\t1\t3\t3\t2\t2\t97\t3\n"))
        .stdout(predicate::str::contains("AB02\t1\t3\t3\t2\t2\tN/A\t3\n"));
}

#[test]
fn test_selected_samples_and_scheme() {
    let f = fixture();
    type_cmd(&f)
        .args(["--samples", "AB01", "--scheme", "pasteur", "--format", "tsv"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Sample\tPasteur_ST\tPasteur_CC\tPasteur_Species\tStatus"))
        .stdout(predicate::str::contains("AB01\tST-2\tCC2"))
        .stdout(predicate::str::contains("AB02").not());
}

#[test]
fn test_overrides_change_outcome() {
    let f = fixture();
    // AB02 resolves six Oxford loci, one short of seven
    type_cmd(&f)
        .args(["--samples", "AB02", "--scheme", "oxford", "--min-genes", "7"])
        .assert()
        .success()
        .stdout(predicate::str::contains("insufficient loci"));

    // every hit is at 100% identity, so only e-value can reject them here
    type_cmd(&f)
        .args(["--samples", "AB01", "--scheme", "oxford", "--max-evalue", "0"])
        .assert()
        .success()
        .stdout(predicate::str::contains("ST-208"));
}

#[test]
fn test_gzipped_hits() {
    let f = fixture();
    let path = f.hits.join("AB03.oxford_vs_query.b6.gz");
    let mut encoder = flate2::write::GzEncoder::new(
        std::fs::File::create(path).unwrap(),
        flate2::Compression::default(),
    );
    encoder
        .write_all(hit_lines(&OXFORD_LOCI, &["1", "12", "3", "2", "2", "97", "3"], &[]).as_bytes())
        .unwrap();
    encoder.finish().unwrap();

    type_cmd(&f)
        .args(["--format", "tsv"])
        .assert()
        .success()
        .stdout(predicate::str::contains("AB03\tST-1417\tN/A"));
}

#[test]
fn test_missing_profile_table_is_reported_per_sample() {
    let f = fixture();
    std::fs::remove_file(f.profiles.join("Pasteur/profiles_pasteur.csv")).unwrap();
    type_cmd(&f)
        .args(["--samples", "AB01"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Oxford: ST-208"))
        .stdout(predicate::str::contains("profiles_pasteur.csv"));
}

#[test]
fn test_missing_hits_directory() {
    let f = fixture();
    Command::cargo_bin("mlst-solver")
        .unwrap()
        .arg("type")
        .arg("--hits")
        .arg(f.hits.join("nope"))
        .arg("--profiles")
        .arg(&f.profiles)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Hits directory not found"));
}

#[test]
fn test_no_samples_found() {
    let f = fixture();
    let empty = f.hits.join("empty");
    std::fs::create_dir(&empty).unwrap();
    Command::cargo_bin("mlst-solver")
        .unwrap()
        .arg("type")
        .arg("--hits")
        .arg(&empty)
        .arg("--profiles")
        .arg(&f.profiles)
        .assert()
        .failure()
        .stderr(predicate::str::contains("No samples found"));
}

#[test]
fn test_invalid_configuration() {
    let f = fixture();
    type_cmd(&f)
        .args(["--min-genes", "8"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid configuration"));

    type_cmd(&f)
        .args(["--scheme", "achtman"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown scheme 'achtman'"));

    let config = f.hits.join("config.json");
    std::fs::write(&config, r#"{"thresholds": {"min_identity": 150}}"#).unwrap();
    type_cmd(&f).arg("--config").arg(&config).assert().failure();
}

#[test]
fn test_config_file_custom_scheme() {
    let f = fixture();
    let config = f._root.path().join("config.json");
    std::fs::write(
        &config,
        r#"{
            "min_genes_required": 2,
            "schemes": [{
                "id": "toy",
                "display_name": "Toy",
                "loci": ["a", "b", "c"],
                "profiles": "toy/profiles.tsv"
            }]
        }"#,
    )
    .unwrap();
    write_table(
        &f.profiles.join("toy/profiles.tsv"),
        &["a", "b", "c"],
        &[("7", &["1", "2", "3"], "")],
    );
    std::fs::write(
        f.hits.join("T1.toy_vs_query.b6"),
        hit_lines(&["a", "b", "c"], &["1", "2", "3"], &["c"]),
    )
    .unwrap();

    type_cmd(&f)
        .arg("--config")
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("Toy: ST-7 (partial, 2/3 loci)"))
        .stdout(predicate::str::contains("AB01").not());
}

#[test]
fn test_schemes_command() {
    Command::cargo_bin("mlst-solver")
        .unwrap()
        .arg("schemes")
        .assert()
        .success()
        .stdout(predicate::str::contains("Oxford (oxford): 7 loci"))
        .stdout(predicate::str::contains("Pas_rpoB"));

    let output = Command::cargo_bin("mlst-solver")
        .unwrap()
        .args(["schemes", "--format", "json"])
        .output()
        .unwrap();
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json[1]["id"], "pasteur");
    assert_eq!(json[1]["hits_suffix"], "pasteur_vs_query.b6");
}
