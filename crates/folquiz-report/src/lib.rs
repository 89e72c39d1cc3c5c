//! folquiz-report: HTML worksheets and grading reports.

pub mod html;
