use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use std::process::Command;
use tempfile::tempdir;

const SYNC: &str = "\
chr2\t84\tA\t30:0:0:0:0:0\t30:0:0:0:0:0\t30:0:0:0:0:0
chr2\t977029\tG\t30:0:0:0:0:0\t30:0:0:0:0:0\t30:0:0:0:0:0
chr2\t977052\tT\t0:0:30:0:0:0\t0:2:28:0:0:0\t0:0:30:0:0:0
chr3\t100\tC\t0:30:0:0:0:0\t0:30:0:0:0:0\t0:15:15:0:0:0
chr3\t5000\tC\t0:30:0:0:0:0\t0:30:0:0:0:0\t0:30:0:0:0:0
";

fn write_sync(dir: &Path) -> std::io::Result<std::path::PathBuf> {
    let p = dir.join("sample.sync");
    fs::write(&p, SYNC)?;
    Ok(p)
}

#[test]
fn frequencies_and_vcf() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let input = write_sync(dir.path())?;
    let out = dir.path().join("out");

    Command::cargo_bin("sync_freq")?
        .args(["-g", "--diff", "pop1,pop3", "-d"])
        .arg(&out)
        .arg(&input)
        .assert()
        .success();

    assert_eq!(
        fs::read_to_string(out.join("sample_frequencies.csv"))?,
        "\
chromosome,position,ref,alt,POP1,POP2,POP3,POP1_GT,POP2_GT,POP3_GT,pop1_pop3_diff
chr2,977029,G,A,1.0,1.0,1.0,1/1,1/1,1/1,0.0
chr2,977052,T,C,1.0,0.933,1.0,1/1,0/1,1/1,0.0
chr3,100,C,T,1.0,1.0,0.5,1/1,1/1,0/1,0.5
chr3,5000,C,T,1.0,1.0,1.0,1/1,1/1,1/1,0.0
"
    );
    assert_eq!(
        fs::read_to_string(out.join("sample.vcf"))?,
        "\
#CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO\tFORMAT\tPOP1\tPOP2\tPOP3\tpop1_pop3_diff
chr2\t977029\t.\tG\tA\t30\t.\tDP=30\tGT:AF\t1/1:1.0\t1/1:1.0\t1/1:1.0\t0.0
chr2\t977052\t.\tT\tC\t30\t.\tDP=30\tGT:AF\t1/1:1.0\t0/1:0.933\t1/1:1.0\t0.0
chr3\t100\t.\tC\tT\t30\t.\tDP=30\tGT:AF\t1/1:1.0\t1/1:1.0\t0/1:0.5\t0.5
chr3\t5000\t.\tC\tT\t30\t.\tDP=30\tGT:AF\t1/1:1.0\t1/1:1.0\t1/1:1.0\t0.0
"
    );
    Ok(())
}

#[test]
fn global_regions() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let input = write_sync(dir.path())?;
    let regions = dir.path().join("regions.csv");
    fs::write(&regions, "start,end\n977000,977040\n90,110\n")?;

    Command::cargo_bin("sync_freq")?
        .args(["-P", "global", "-d"])
        .arg(dir.path())
        .arg("-r")
        .arg(&regions)
        .arg(&input)
        .assert()
        .success();

    assert_eq!(
        fs::read_to_string(dir.path().join("global_frequencies.csv"))?,
        "\
chromosome,position,ref,alt,POP1,POP2,POP3
chr2,977029,G,A,1.0,1.0,1.0
chr3,100,C,T,1.0,1.0,0.5
"
    );
    Ok(())
}

#[test]
fn per_chromosome_regions() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let input = write_sync(dir.path())?;
    let rdir = dir.path().join("regions");
    fs::create_dir(&rdir)?;
    fs::write(rdir.join("chr2_regions.csv"), "start,end\n977040,977060\n")?;

    // No region file for chr3, so all of chr3 is kept with a warning
    Command::cargo_bin("sync_freq")?
        .args(["-P", "per_chrom", "-d"])
        .arg(dir.path())
        .arg("-R")
        .arg(&rdir)
        .arg(&input)
        .assert()
        .success()
        .stderr(predicate::str::contains("No regions found for chr3"));

    assert_eq!(
        fs::read_to_string(dir.path().join("per_chrom_frequencies.csv"))?,
        "\
chromosome,position,ref,alt,POP1,POP2,POP3
chr2,977052,T,C,1.0,0.933,1.0
chr3,100,C,T,1.0,1.0,0.5
chr3,5000,C,T,1.0,1.0,1.0
"
    );
    Ok(())
}

#[test]
fn malformed_rows() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let input = dir.path().join("bad.sync");
    fs::write(
        &input,
        format!("{}chr3\t6000\tC\t0:30:0:0\t0:30:0:0:0:0\t0:30:0:0:0:0\n", SYNC),
    )?;

    Command::cargo_bin("sync_freq")?
        .arg("-d")
        .arg(dir.path())
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("bad.sync:6"))
        .stderr(predicate::str::contains("partial output left in"));

    Command::cargo_bin("sync_freq")?
        .args(["--skip-malformed", "-d"])
        .arg(dir.path())
        .arg(&input)
        .assert()
        .success()
        .stderr(predicate::str::contains("1 malformed rows skipped"));

    let s = fs::read_to_string(dir.path().join("bad_frequencies.csv"))?;
    assert_eq!(s.lines().count(), 5);
    Ok(())
}

#[test]
fn unknown_diff_population() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let input = write_sync(dir.path())?;

    Command::cargo_bin("sync_freq")?
        .args(["--diff", "pop1,pop9", "-d"])
        .arg(dir.path())
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("pop9"));
    assert!(!dir.path().join("sample_frequencies.csv").exists());
    Ok(())
}
