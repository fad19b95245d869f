use crate::error::Result;
use crate::models::application::{ApplicationDetail, ApplicationStatus, BadgeTone};
use crate::services::dashboard_service::count_by_status;
use crate::utils::time::eat;
use rust_xlsxwriter::*;

pub struct ExportService;

impl ExportService {
    fn tone_color(tone: BadgeTone) -> Color {
        match tone {
            BadgeTone::Neutral => Color::RGB(0x64748B),   // Slate 500
            BadgeTone::Info => Color::RGB(0x3B82F6),      // Blue
            BadgeTone::Highlight => Color::RGB(0x8B5CF6), // Violet
            BadgeTone::Success => Color::RGB(0x10B981),   // Emerald
            BadgeTone::Danger => Color::RGB(0xEF4444),    // Red
        }
    }

    fn or_dash(value: Option<&str>) -> &str {
        value.filter(|v| !v.trim().is_empty()).unwrap_or("—")
    }
}

impl ExportService {
    /// Styled XLSX workbook of an employer's applicants.
    pub fn generate_applicants_xlsx(applicants: &[ApplicationDetail]) -> Result<Vec<u8>> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.set_name("Applicants")?;

        let primary_color = Color::RGB(0x1E293B); // Slate 800
        let header_bg = Color::RGB(0x0F172A); // Slate 900
        let header_text = Color::White;
        let alt_row_1 = Color::RGB(0xF8FAFC); // Slate 50
        let alt_row_2 = Color::White;
        let border_color = Color::RGB(0xE2E8F0); // Slate 200

        let columns = [
            ("#", 6.0),
            ("Applicant", 28.0),
            ("Email", 30.0),
            ("Location", 18.0),
            ("Skills", 36.0),
            ("Rating", 10.0),
            ("Job", 30.0),
            ("Status", 20.0),
            ("Applied", 18.0),
            ("Interview", 20.0),
            ("Notes", 40.0),
        ];
        let last_col = (columns.len() - 1) as u16;

        for (i, (_, width)) in columns.iter().enumerate() {
            worksheet.set_column_width(i as u16, *width)?;
        }

        // Title
        let title_format = Format::new()
            .set_font_size(16)
            .set_bold()
            .set_font_color(header_text)
            .set_background_color(primary_color)
            .set_align(FormatAlign::CenterAcross)
            .set_align(FormatAlign::VerticalCenter);
        worksheet.set_row_height(0, 40)?;
        worksheet.merge_range(0, 0, 0, last_col, "JobSoko applicants report", &title_format)?;

        let subtitle_format = Format::new()
            .set_font_size(10)
            .set_italic()
            .set_font_color(Color::RGB(0x94A3B8))
            .set_background_color(primary_color)
            .set_align(FormatAlign::CenterAcross)
            .set_align(FormatAlign::VerticalCenter);
        worksheet.set_row_height(1, 22)?;
        let now = chrono::Utc::now()
            .with_timezone(&eat())
            .format("%d %b %Y %H:%M EAT")
            .to_string();
        let subtitle_text = format!("Exported {}  •  {} applicants", now, applicants.len());
        worksheet.merge_range(1, 0, 1, last_col, &subtitle_text, &subtitle_format)?;

        // Header
        let header_format = Format::new()
            .set_bold()
            .set_font_size(10)
            .set_font_color(header_text)
            .set_background_color(header_bg)
            .set_align(FormatAlign::Center)
            .set_align(FormatAlign::VerticalCenter)
            .set_text_wrap()
            .set_border(FormatBorder::Thin)
            .set_border_color(border_color);
        let header_row = 2;
        worksheet.set_row_height(header_row, 30)?;
        for (i, (name, _)) in columns.iter().enumerate() {
            worksheet.write_string_with_format(header_row, i as u16, *name, &header_format)?;
        }

        let data_start_row = 3;
        for (idx, detail) in applicants.iter().enumerate() {
            let row = data_start_row + idx as u32;
            let app = &detail.application;
            let bg = if idx % 2 == 0 { alt_row_1 } else { alt_row_2 };

            let base_fmt = Format::new()
                .set_font_size(10)
                .set_background_color(bg)
                .set_align(FormatAlign::VerticalCenter)
                .set_border(FormatBorder::Thin)
                .set_border_color(border_color);
            let center_fmt = base_fmt.clone().set_align(FormatAlign::Center);
            let wrap_fmt = base_fmt.clone().set_text_wrap();

            worksheet.set_row_height(row, 22)?;
            worksheet.write_number_with_format(row, 0, (idx + 1) as f64, &center_fmt)?;
            worksheet.write_string_with_format(
                row,
                1,
                &detail.applicant_name,
                &base_fmt.clone().set_bold(),
            )?;
            worksheet.write_string_with_format(row, 2, &detail.applicant_email, &base_fmt)?;
            worksheet.write_string_with_format(
                row,
                3,
                Self::or_dash(detail.applicant_location.as_deref()),
                &base_fmt,
            )?;
            let skills = detail.applicant_skills.join(", ");
            worksheet.write_string_with_format(row, 4, Self::or_dash(Some(skills.as_str())), &wrap_fmt)?;

            match detail.applicant_rating {
                Some(rating) => {
                    worksheet.write_number_with_format(row, 5, rating, &center_fmt.clone().set_num_format("0.0"))?
                }
                None => worksheet.write_string_with_format(row, 5, "—", &center_fmt)?,
            };

            worksheet.write_string_with_format(row, 6, &detail.job_title, &wrap_fmt)?;

            let badge = app.status.badge();
            let status_fmt = Format::new()
                .set_font_size(10)
                .set_bold()
                .set_font_color(Color::White)
                .set_background_color(Self::tone_color(badge.tone))
                .set_align(FormatAlign::Center)
                .set_align(FormatAlign::VerticalCenter)
                .set_border(FormatBorder::Thin)
                .set_border_color(border_color);
            worksheet.write_string_with_format(row, 7, badge.label, &status_fmt)?;

            let applied = app
                .applied_at
                .with_timezone(&eat())
                .format("%d.%m.%Y %H:%M")
                .to_string();
            worksheet.write_string_with_format(row, 8, &applied, &center_fmt)?;

            let interview = app
                .interview_date
                .map(|d| d.with_timezone(&eat()).format("%d.%m.%Y %H:%M").to_string())
                .unwrap_or_else(|| "—".to_string());
            worksheet.write_string_with_format(row, 9, &interview, &center_fmt)?;
            worksheet.write_string_with_format(row, 10, Self::or_dash(app.notes.as_deref()), &wrap_fmt)?;
        }

        // Summary
        let total_row = data_start_row + applicants.len() as u32 + 1;
        let summary_fmt = Format::new()
            .set_bold()
            .set_font_size(10)
            .set_font_color(primary_color)
            .set_background_color(Color::RGB(0xE0E7FF)) // Indigo 100
            .set_align(FormatAlign::Center)
            .set_align(FormatAlign::VerticalCenter)
            .set_border(FormatBorder::Thin)
            .set_border_color(border_color);
        worksheet.set_row_height(total_row, 26)?;
        worksheet.merge_range(
            total_row,
            0,
            total_row,
            2,
            &format!("Total: {} applicants", applicants.len()),
            &summary_fmt,
        )?;

        let counts = count_by_status(applicants);
        let status_summary = ApplicationStatus::ALL
            .iter()
            .map(|s| format!("{}: {}", s.badge().label, counts.get(s).copied().unwrap_or(0)))
            .collect::<Vec<_>>()
            .join(" | ");
        worksheet.merge_range(total_row, 3, total_row, last_col, &status_summary, &summary_fmt)?;

        worksheet.set_freeze_panes(3, 0)?;
        worksheet.autofilter(
            2,
            0,
            (data_start_row + applicants.len() as u32).saturating_sub(1).max(2),
            last_col,
        )?;

        let buffer = workbook.save_to_buffer()?;
        Ok(buffer)
    }
}
