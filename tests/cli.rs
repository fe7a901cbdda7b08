use assert_cmd::Command;
use assert_fs::prelude::*;
use predicates::prelude::*;

const BINARY: &str = "seqtools";
type TestResult = Result<(), Box<dyn std::error::Error>>;

const LENGTH_FASTQ: &str = "@short\nATGC\n+\nIIII\n@long\nATGCGTAT\n+\nIIIIIIII\n";

#[test]
fn file_doesnt_exist() -> TestResult {
    let temp = assert_fs::TempDir::new()?;

    Command::cargo_bin(BINARY)?
        .current_dir(temp.path())
        .args(["filter", "file_which_does_not_exist.fastq"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unable to open file"));

    temp.child("filtered").assert(predicate::path::missing());
    Ok(())
}

#[test]
fn filter_by_length_into_default_directory() -> TestResult {
    let temp = assert_fs::TempDir::new()?;
    temp.child("length_test.fastq").write_str(LENGTH_FASTQ)?;

    Command::cargo_bin(BINARY)?
        .current_dir(temp.path())
        .args(["filter", "length_test.fastq", "-o", "out.fastq", "--len", "5,10"])
        .assert()
        .success();

    temp.child("filtered/out.fastq")
        .assert("@long\nATGCGTAT\n+\nIIIIIIII\n");
    Ok(())
}

#[test]
fn filter_with_scalar_gc_bound() -> TestResult {
    let temp = assert_fs::TempDir::new()?;
    temp.child("in.fastq").write_str(
        "@tooGC\nGCGCGC\n+\nIIIIII\n@okGC\nATGCAT\n+\nIIIIII\n",
    )?;
    let out_dir = temp.child("results");

    Command::cargo_bin(BINARY)?
        .current_dir(temp.path())
        .args(["filter", "in.fastq", "--gc", "70", "--output-dir", "results"])
        .assert()
        .success();

    out_dir
        .child("output_filter.fastq")
        .assert(predicate::str::starts_with("@okGC\n"));
    Ok(())
}

#[test]
fn no_output_when_nothing_passes() -> TestResult {
    let temp = assert_fs::TempDir::new()?;
    temp.child("input.fastq")
        .write_str("@low_quality\nATATAT\n+\n&&&&&&\n")?;

    Command::cargo_bin(BINARY)?
        .current_dir(temp.path())
        .args([
            "filter",
            "input.fastq",
            "-o",
            "no_output.fastq",
            "--quality",
            "40",
            "--gc",
            "80,100",
        ])
        .assert()
        .success();

    temp.child("filtered").assert(predicate::path::missing());
    Ok(())
}

#[test]
fn malformed_input_is_rejected() -> TestResult {
    let temp = assert_fs::TempDir::new()?;
    temp.child("not_a_fastq.txt")
        .write_str("This is not a fastq file")?;

    Command::cargo_bin(BINARY)?
        .current_dir(temp.path())
        .args(["filter", "not_a_fastq.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("is not a valid FASTQ file"));

    temp.child("filtered").assert(predicate::path::missing());
    Ok(())
}

#[test]
fn compressed_input_is_rejected() -> TestResult {
    let temp = assert_fs::TempDir::new()?;
    temp.child("reads.fastq.gz")
        .write_binary(&[0x1f, 0x8b, 0x08, 0x00, 0xff, 0xfe, b'\n', 0x80, 0x81])?;

    Command::cargo_bin(BINARY)?
        .current_dir(temp.path())
        .args(["filter", "reads.fastq.gz"])
        .assert()
        .failure()
        .stderr(
            predicate::str::contains("is not a valid FASTQ file")
                .and(predicate::str::contains("line 1: not plain text")),
        );

    temp.child("filtered").assert(predicate::path::missing());
    Ok(())
}

#[test]
fn nan_bounds_are_rejected() -> TestResult {
    Command::cargo_bin(BINARY)?
        .args(["filter", "in.fastq", "--gc", "0,nan"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid maximum value"));
    Ok(())
}

#[test]
fn invalid_bounds_are_rejected() -> TestResult {
    Command::cargo_bin(BINARY)?
        .args(["filter", "in.fastq", "--len", "1,2,3"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid bounds format"));
    Ok(())
}

#[test]
fn filter_report() -> TestResult {
    let temp = assert_fs::TempDir::new()?;
    temp.child("in.fastq").write_str(LENGTH_FASTQ)?;

    Command::cargo_bin(BINARY)?
        .current_dir(temp.path())
        .args(["filter", "in.fastq", "--len", "5,10", "--report", "report.tsv", "-t", "2"])
        .assert()
        .success();

    temp.child("report.tsv").assert(
        predicate::str::starts_with("#{")
            .and(predicate::str::contains("id\tlen\tgc\tavg_qual\tpassed\n"))
            .and(predicate::str::contains("short\t4\t50.0\t40.0\tfalse\n"))
            .and(predicate::str::contains("long\t8\t37.5\t40.0\ttrue\n")),
    );
    Ok(())
}

#[test]
fn na_transcribe_reports_rna() -> TestResult {
    Command::cargo_bin(BINARY)?
        .args(["na", "transcribe", "ATGC", "AUGC"])
        .assert()
        .success()
        .stdout("AUGC\n")
        .stderr(predicate::str::contains("transcribe is not supported for RNA sequences"));
    Ok(())
}

#[test]
fn na_reverse_complement_many() -> TestResult {
    Command::cargo_bin(BINARY)?
        .args(["na", "reverse-complement", "ATGC", "aug", "ATU"])
        .assert()
        .success()
        .stdout("GCAT\ncau\n")
        .stderr(predicate::str::contains("undetermined"));
    Ok(())
}

#[test]
fn na_accepts_underscored_operation_name() -> TestResult {
    Command::cargo_bin(BINARY)?
        .args(["na", "reverse_complement", "ATGC"])
        .assert()
        .success()
        .stdout("GCAT\n");
    Ok(())
}

#[test]
fn protein_validation() -> TestResult {
    Command::cargo_bin(BINARY)?
        .args(["protein", "MFVNQHLCGSHLVEALYLVCGERGFFYTPKT"])
        .assert()
        .success()
        .stdout("valid protein of 31 residues\n");

    Command::cargo_bin(BINARY)?
        .args(["protein", "MKV"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("too short"));
    Ok(())
}

#[test]
fn fasta_oneline() -> TestResult {
    let temp = assert_fs::TempDir::new()?;
    temp.child("multi.fasta")
        .write_str(">a desc\nACGT\nAC\n>b\nGG\n")?;

    Command::cargo_bin(BINARY)?
        .current_dir(temp.path())
        .args(["fasta-oneline", "multi.fasta", "-o", "one.fasta"])
        .assert()
        .success();

    temp.child("one.fasta").assert(">a desc\nACGTAC\n>b\nGG\n");
    Ok(())
}

#[test]
fn gbk_neighbours() -> TestResult {
    let temp = assert_fs::TempDir::new()?;
    temp.child("in.gbk").write_str(concat!(
        "FEATURES             Location/Qualifiers\n",
        "     CDS             1..10\n",
        "                     /gene=\"first\"\n",
        "                     /translation=\"MAAA\"\n",
        "     CDS             11..20\n",
        "                     /gene=\"target\"\n",
        "                     /translation=\"MBBB\"\n",
        "     CDS             21..30\n",
        "                     /gene=\"last\"\n",
        "                     /translation=\"MCCC\n",
        "                     DDD\"\n",
        "ORIGIN\n",
        "//\n",
    ))?;

    Command::cargo_bin(BINARY)?
        .current_dir(temp.path())
        .args(["gbk-neighbours", "in.gbk", "--genes", "targ", "-o", "n.fasta"])
        .assert()
        .success();

    temp.child("n.fasta")
        .assert(">first\nMAAA\n>last\nMCCCDDD\n");
    Ok(())
}

#[test]
fn blast_best() -> TestResult {
    let temp = assert_fs::TempDir::new()?;
    temp.child("blast.txt").write_str(concat!(
        "Description    Scientific Name\n",
        ">MULTISPECIES: Zinc protease [Bacteria]\n",
        "Description    Scientific Name\n",
        ">acid phosphatase [Escherichia coli]\n",
    ))?;

    Command::cargo_bin(BINARY)?
        .current_dir(temp.path())
        .args(["blast-best", "blast.txt"])
        .assert()
        .success();

    temp.child("output_blast.txt")
        .assert("acid phosphatase\nZinc protease\n");
    Ok(())
}
