use crate::descriptive::SummaryStats;
use crate::report::{AnalysisReport, TestSummary};

/// Render the plain-text summary printed after a report run.
pub fn format_summary(report: &AnalysisReport) -> String {
    let mut out = String::new();
    out.push_str(&format!("tma-statistics v{}\n", report.tool_version));
    out.push_str(&format!(
        "Input: {} spots, {} cases, {} columns\n",
        report.meta.rows, report.meta.cases, report.meta.columns
    ));
    if report.meta.missing_grade_rows > 0 {
        out.push_str(&format!(
            "Grade missing on {} spots ({} cases ungraded)\n",
            report.meta.missing_grade_rows, report.meta.cases_without_grade
        ));
    }

    out.push_str("\nLabeling index, all spots\n");
    out.push_str(&format!("  visual : {}\n", fmt_stats(&report.overall.visual)));
    out.push_str(&format!("  digital: {}\n", fmt_stats(&report.overall.digital)));

    out.push_str("\nMethod comparison (digital - visual)\n");
    out.push_str(&format!(
        "  mean difference {:+.2}, median difference {:+.2}\n",
        report.method_comparison.mean_difference, report.method_comparison.median_difference
    ));
    out.push_str(&format!(
        "  Wilcoxon signed-rank: V={}, p={}\n",
        fmt_opt(report.method_comparison.wilcoxon_signed_rank.statistic, 1),
        fmt_p(report.method_comparison.wilcoxon_signed_rank.p_value)
    ));
    out.push_str(&format!(
        "  paired t on log1p scores: t={}, df={}, p={}\n",
        fmt_opt(report.method_comparison.paired_t_log1p.statistic, 3),
        fmt_opt(report.method_comparison.paired_t_log1p.degrees_of_freedom, 0),
        fmt_p(report.method_comparison.paired_t_log1p.p_value)
    ));

    out.push_str("\nCorrelation between methods\n");
    out.push_str(&format!(
        "  Spearman rho={}, p={}\n",
        fmt_opt(report.correlations.spearman.statistic, 3),
        fmt_p(report.correlations.spearman.p_value)
    ));
    out.push_str(&format!(
        "  Pearson on log1p scores r={}, p={}\n",
        fmt_opt(report.correlations.pearson_log1p.statistic, 3),
        fmt_p(report.correlations.pearson_log1p.p_value)
    ));
    out.push_str("  Spearman by subtype:\n");
    for row in &report.correlations.spearman_by_subtype {
        out.push_str(&format!(
            "    {:<16} n={:<3} rho={}, p={}, p_adj={}\n",
            row.label,
            row.n_spots,
            fmt_opt(row.rho, 3),
            fmt_p(row.p_value),
            fmt_p(row.p_adjusted)
        ));
    }

    out.push_str("\nGroup comparisons\n");
    out.push_str(&format!(
        "  Kruskal-Wallis across subtypes (spots): visual {} | digital {}\n",
        fmt_h_test(&report.group_tests.subtype_kruskal_wallis.visual),
        fmt_h_test(&report.group_tests.subtype_kruskal_wallis.digital)
    ));
    out.push_str(&format!(
        "  Kruskal-Wallis across grades (case means): visual {} | digital {}\n",
        fmt_h_test(&report.group_tests.grade_kruskal_wallis.visual),
        fmt_h_test(&report.group_tests.grade_kruskal_wallis.digital)
    ));
    out.push_str(&format!(
        "  Mann-Whitney grade 1-2 vs 3 (case means): visual U={}, p={} | digital U={}, p={}\n",
        fmt_opt(report.group_tests.grade_low_vs_high.visual.statistic, 1),
        fmt_p(report.group_tests.grade_low_vs_high.visual.p_value),
        fmt_opt(report.group_tests.grade_low_vs_high.digital.statistic, 1),
        fmt_p(report.group_tests.grade_low_vs_high.digital.p_value)
    ));

    if !report.exclusions.is_empty() {
        out.push_str("\nExclusions:\n");
        for note in &report.exclusions {
            out.push_str(&format!("- {}\n", note));
        }
    }

    out
}

fn fmt_stats(stats: &SummaryStats) -> String {
    format!(
        "n={} mean={:.1} sd={} median={:.1} IQR={:.1}-{:.1} range={:.1}-{:.1}",
        stats.n,
        stats.mean,
        fmt_opt(stats.sd, 1),
        stats.median,
        stats.q1,
        stats.q3,
        stats.min,
        stats.max
    )
}

fn fmt_h_test(test: &TestSummary) -> String {
    format!(
        "H={}, df={}, p={}",
        fmt_opt(test.statistic, 2),
        fmt_opt(test.degrees_of_freedom, 0),
        fmt_p(test.p_value)
    )
}

fn fmt_opt(value: Option<f64>, decimals: usize) -> String {
    match value {
        Some(v) => format!("{:.*}", decimals, v),
        None => "NA".to_string(),
    }
}

fn fmt_p(p: Option<f64>) -> String {
    match p {
        Some(p) if p < 0.0001 => "<0.0001".to_string(),
        Some(p) => format!("{:.4}", p),
        None => "NA".to_string(),
    }
}
