use std::fs;

use tempfile::tempdir;

#[test]
fn default_run_writes_log_and_prints_turns() {
    let temp_dir = tempdir().unwrap();
    let output = assert_cmd::cargo::cargo_bin_cmd!("herd")
        .arg("--output-dir")
        .arg(temp_dir.path())
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.starts_with("The simulation has ended after "));
    assert!(stdout.trim_end().ends_with(" turns."));

    let log_path = temp_dir
        .path()
        .join("Ebola_simulation_pop_20_vp_0.1_infected_5.txt");
    let log = fs::read_to_string(log_path).unwrap();
    assert!(log.starts_with(
        "population_size: 20\tvaccination_fraction: 0.1\tpathogen: Ebola\t\
         mortality_probability: 0.7\ttransmission_probability: 0.25"
    ));
    assert!(log.lines().any(|line| line.starts_with("Time step 1 ended")));
}

#[test]
fn positional_model_arguments_and_csv() {
    let temp_dir = tempdir().unwrap();
    assert_cmd::cargo::cargo_bin_cmd!("herd")
        .args(["Measles", "0.3", "0.05", "100", "0.4", "2"])
        .arg("--random-seed")
        .arg("8")
        .arg("--csv")
        .arg("--output-dir")
        .arg(temp_dir.path())
        .assert()
        .success();

    assert!(temp_dir
        .path()
        .join("Measles_simulation_pop_100_vp_0.4_infected_2.txt")
        .exists());
    for report in ["interactions.csv", "survival.csv", "steps.csv", "run.json"] {
        assert!(temp_dir.path().join(report).exists(), "{report} is missing");
    }
}

#[test]
fn same_seed_same_output() {
    let first_dir = tempdir().unwrap();
    let second_dir = tempdir().unwrap();
    for dir in [&first_dir, &second_dir] {
        assert_cmd::cargo::cargo_bin_cmd!("herd")
            .args(["-r", "123", "-o"])
            .arg(dir.path())
            .assert()
            .success();
    }

    let file_name = "Ebola_simulation_pop_20_vp_0.1_infected_5.txt";
    assert_eq!(
        fs::read_to_string(first_dir.path().join(file_name)).unwrap(),
        fs::read_to_string(second_dir.path().join(file_name)).unwrap()
    );
}

#[test]
fn config_file() {
    let temp_dir = tempdir().unwrap();
    let config = temp_dir.path().join("flu.json");
    fs::write(
        &config,
        r#"{
            "pathogen_name": "Flu",
            "transmission_probability": 0.2,
            "mortality_probability": 0.01,
            "population_size": 30,
            "vaccination_fraction": 0.5,
            "initial_infected": 3
        }"#,
    )
    .unwrap();

    assert_cmd::cargo::cargo_bin_cmd!("herd")
        .arg("--config")
        .arg(&config)
        .arg("--output-dir")
        .arg(temp_dir.path())
        .assert()
        .success();
    assert!(temp_dir
        .path()
        .join("Flu_simulation_pop_30_vp_0.5_infected_3.txt")
        .exists());
}

#[test]
fn invalid_probability_fails() {
    let temp_dir = tempdir().unwrap();
    let output = assert_cmd::cargo::cargo_bin_cmd!("herd")
        .args(["Ebola", "1.5", "0.7", "20", "0.1"])
        .arg("--output-dir")
        .arg(temp_dir.path())
        .output()
        .unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("transmission probability must be in [0, 1]"));
    assert_eq!(fs::read_dir(temp_dir.path()).unwrap().count(), 0);
}

#[test]
fn incomplete_model_arguments_fail() {
    let temp_dir = tempdir().unwrap();
    assert_cmd::cargo::cargo_bin_cmd!("herd")
        .args(["Ebola", "0.25", "0.7"])
        .arg("--output-dir")
        .arg(temp_dir.path())
        .assert()
        .failure();
}

#[test]
fn module_log_levels() {
    let temp_dir = tempdir().unwrap();
    let output = assert_cmd::cargo::cargo_bin_cmd!("herd")
        .args(["--log-level", "error,herd::simulation=info", "-o"])
        .arg(temp_dir.path())
        .output()
        .unwrap();
    assert!(output.status.success());

    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("herd::simulation - starting simulation of Ebola"));
    assert!(!stderr.contains("herd::runner"));
}

#[test]
fn unknown_log_level_fails() {
    let temp_dir = tempdir().unwrap();
    assert_cmd::cargo::cargo_bin_cmd!("herd")
        .args(["--log-level", "loud", "-o"])
        .arg(temp_dir.path())
        .assert()
        .failure();
}
