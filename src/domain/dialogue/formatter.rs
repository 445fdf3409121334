//! Response formatter.
//!
//! Renders tickets, appointments and bills into chat text. Output depends only
//! on the record and the configured UTC offset, so the same record always
//! renders to the same bytes.

use chrono::{DateTime, FixedOffset, NaiveDate};

use crate::domain::catalog::{Facility, Practitioner};
use crate::domain::records::{Appointment, Bill, Ticket};

/// One appointment plus the catalog entries it refers to, when known.
#[derive(Debug, Clone, Copy)]
pub struct AppointmentView<'a> {
    pub appointment: &'a Appointment,
    pub facility: Option<&'a Facility>,
    pub practitioner: Option<&'a Practitioner>,
}

#[derive(Debug, Clone, Copy)]
pub struct ResponseFormatter {
    offset: FixedOffset,
}

impl ResponseFormatter {
    pub fn new(offset: FixedOffset) -> Self {
        Self { offset }
    }

    /// Formats an amount as grouped integer dong, e.g. `1.250.000 ₫`.
    pub fn currency(&self, amount: f64) -> String {
        let rounded = amount.round() as i64;
        let digits = rounded.unsigned_abs().to_string();
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, ch) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push('.');
            }
            grouped.push(ch);
        }
        let sign = if rounded < 0 { "-" } else { "" };
        format!("{sign}{grouped} ₫")
    }

    /// Renders a service date as `DD/MM/YYYY`; unparseable input is echoed.
    pub fn date(&self, raw: &str) -> String {
        if let Ok(instant) = DateTime::parse_from_rfc3339(raw) {
            return instant
                .with_timezone(&self.offset)
                .format("%d/%m/%Y")
                .to_string();
        }
        raw.get(..10)
            .and_then(|prefix| NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok())
            .map(|d| d.format("%d/%m/%Y").to_string())
            .unwrap_or_else(|| raw.to_string())
    }

    /// Renders an instant as local `HH:MM:SS`; unparseable input is echoed.
    pub fn clock(&self, raw: &str) -> String {
        DateTime::parse_from_rfc3339(raw)
            .map(|instant| instant.with_timezone(&self.offset).format("%H:%M:%S").to_string())
            .unwrap_or_else(|_| raw.to_string())
    }

    pub fn ticket(&self, ticket: &Ticket) -> String {
        let mut out = format!(
            "📋 **Thông tin số của bạn:**\n\n\
             - Mã số: **{code}**\n\
             - Số thứ tự: **{number}**\n\
             - Loại: **{queue}**\n\
             - Trạng thái: **{status}**\n\
             - Ngày khám: **{date}**\n\n\
             📊 **Tình trạng hàng đợi:**\n\
             - Số đang gọi: **{current}**\n\
             - Số người chờ trước: **{waiting}**\n\
             - Thời gian chờ dự kiến: **{eta} phút**\n\n\
             👤 **Thông tin bệnh nhân:**\n\
             - Họ tên: {name}\n\
             - SĐT: {phone}",
            code = ticket.ticket_code,
            number = ticket.ticket_number,
            queue = ticket.queue_type.label(),
            status = ticket.ticket_status.label(),
            date = self.date(&ticket.visit_date),
            current = ticket.current_number,
            waiting = ticket.waiting_before,
            eta = ticket.estimated_wait_minutes,
            name = ticket.patient_info.full_name,
            phone = ticket.patient_info.phone_number,
        );
        if let Some(national_id) = &ticket.patient_info.national_id {
            out.push_str(&format!("\n- CMND/CCCD: {national_id}"));
        }
        out.push_str(&format!("\n\n🕐 Đã cấp lúc: {}", self.clock(&ticket.issued_at)));
        out
    }

    pub fn appointment(&self, view: AppointmentView<'_>) -> String {
        let a = view.appointment;
        let mut out = format!("📋 **Thông tin lịch hẹn:**\n\n🆔 Mã lịch hẹn: {}\n\n", a.appointment_id);

        match view.facility {
            Some(f) => out.push_str(&format!(
                "🏥 Bệnh viện: {}\n📍 {}\n📞 {}\n\n",
                f.name, f.address, f.phone
            )),
            None => out.push_str(&format!("🏥 Bệnh viện: {}\n\n", a.facility_id)),
        }
        match view.practitioner {
            Some(p) => out.push_str(&format!("👨‍⚕️ Bác sĩ: {}\n📞 {}\n\n", p.name, p.phone)),
            None => out.push_str(&format!("👨‍⚕️ Bác sĩ: {}\n\n", a.practitioner_id)),
        }

        out.push_str(&format!(
            "📅 Ngày khám: {}\n⏰ Giờ khám: {}\n\n\
             👤 **Thông tin bệnh nhân:**\n\
             • Họ tên: {}\n\
             • SĐT: {}\n\
             • Email: {}",
            self.date(&a.date),
            a.time,
            a.patient_name,
            a.patient_phone,
            a.patient_email,
        ));
        if let Some(symptoms) = a.symptoms.as_deref().filter(|s| !s.is_empty()) {
            out.push_str(&format!("\n• Triệu chứng: {symptoms}"));
        }
        out.push_str(&format!("\n\n📌 **Trạng thái:** {}", a.status.label()));
        out
    }

    /// One line per appointment: date, time, where, with whom, status.
    pub fn appointment_list(&self, views: &[AppointmentView<'_>]) -> String {
        let lines: Vec<String> = views
            .iter()
            .enumerate()
            .map(|(i, view)| {
                let a = view.appointment;
                let facility = view
                    .facility
                    .map(|f| f.name.as_str())
                    .unwrap_or(a.facility_id.as_str());
                let practitioner = view
                    .practitioner
                    .map(|p| p.name.as_str())
                    .unwrap_or(a.practitioner_id.as_str());
                format!(
                    "{}. 📅 {} ⏰ {} | 🏥 {} | 👨‍⚕️ {} | {}",
                    i + 1,
                    self.date(&a.date),
                    a.time,
                    facility,
                    practitioner,
                    a.status.label()
                )
            })
            .collect();
        format!("📅 **Lịch hẹn của bạn:**\n\n{}", lines.join("\n"))
    }

    pub fn bill(&self, bill: &Bill) -> String {
        let mut out = format!(
            "📋 **Thông tin viện phí của bạn**\n\n\
             🏥 Bệnh viện: {}\n\
             📅 Ngày khám: {}\n\
             🆔 Mã khám: {}\n\n\
             💊 **Dịch vụ đã sử dụng:**\n",
            bill.facility_name,
            self.date(&bill.visit_date),
            bill.visit_id,
        );
        for (i, service) in bill.services.iter().enumerate() {
            out.push_str(&format!(
                "{}. {} (x{} × {}): {}\n",
                i + 1,
                service.service_name,
                service.quantity,
                self.currency(service.unit_price),
                self.currency(service.total_price),
            ));
        }
        out.push_str(&format!(
            "\n💰 **Chi tiết thanh toán:**\n\
             • Tổng chi phí: {}\n\
             • BHYT chi trả: {}\n\
             • **Bạn cần trả: {}**\n\n",
            self.currency(bill.total_base_price),
            self.currency(bill.total_insurance_covered),
            self.currency(bill.total_patient_pay),
        ));
        if let Some(note) = bill.note.as_deref().filter(|n| !n.is_empty()) {
            out.push_str(&format!("📝 Ghi chú: {note}\n\n"));
        }
        out.push_str("Bạn có câu hỏi gì về viện phí này không?");
        out
    }
}
