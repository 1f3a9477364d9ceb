use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};

use crate::dataset::views::ScoreMethod;
use crate::descriptive::SummaryStats;
use crate::report::AnalysisReport;

/// Write the grouped descriptive-statistics table as TSV.
pub fn write_tsv(path: &Path, report: &AnalysisReport) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    let mut w = BufWriter::new(file);

    let visual = ScoreMethod::Visual.label();
    let digital = ScoreMethod::Digital.label();

    writeln!(w, "group\tlevel\tmethod\tn\tmean\tsd\tmedian\tq1\tq3\tmin\tmax")?;

    write_row(&mut w, "overall", "all", visual, &report.overall.visual)?;
    write_row(&mut w, "overall", "all", digital, &report.overall.digital)?;

    for group in &report.by_subtype {
        write_row(&mut w, "subtype", &group.label, visual, &group.visual)?;
        write_row(&mut w, "subtype", &group.label, digital, &group.digital)?;
    }
    for group in &report.by_grade {
        write_row(&mut w, "grade", &group.label, visual, &group.visual)?;
        write_row(&mut w, "grade", &group.label, digital, &group.digital)?;
    }

    Ok(())
}

fn write_row<W: Write>(
    w: &mut W,
    group: &str,
    level: &str,
    method: &str,
    stats: &SummaryStats,
) -> Result<()> {
    let sd = match stats.sd {
        Some(sd) => format!("{:.4}", sd),
        None => "NA".to_string(),
    };
    writeln!(
        w,
        "{}\t{}\t{}\t{}\t{:.4}\t{}\t{:.4}\t{:.4}\t{:.4}\t{:.4}\t{:.4}",
        group, level, method, stats.n, stats.mean, sd, stats.median, stats.q1, stats.q3, stats.min,
        stats.max
    )?;
    Ok(())
}
