//! Fixed reply texts.

use chrono::NaiveDate;

use super::flow::QueueOperation;
use super::slot::FlowKind;
use crate::domain::catalog::{numbered_menu, Facility, Practitioner, SlotTable, TimeSlot};

pub fn help_menu() -> String {
    "👋 **Mình có thể giúp bạn:**\n\n\
     1️⃣ **Đặt lịch khám**\n   💬 \"Đặt lịch khám\"\n\n\
     2️⃣ **Check-in & lấy số**\n   💬 \"Tôi muốn lấy số BHYT, tên Nguyễn Văn A, SĐT 0912345678, CCCD 001234567890\"\n\n\
     3️⃣ **Xem trạng thái số**\n   💬 \"Còn bao nhiêu số nữa tới lượt tôi?\"\n\n\
     4️⃣ **Cấp lại số**\n   💬 \"Cấp lại số dịch vụ cho tôi\"\n\n\
     5️⃣ **Xem viện phí / lịch hẹn**\n   💬 \"Viện phí của tôi\" / \"Xem lịch hẹn\"\n\n\
     🧹 **Hủy quy trình**\n   💬 \"Hủy\" / \"Reset\"\n\n\
     Bạn muốn làm gì?"
        .to_string()
}

pub fn empty_message() -> String {
    "Bạn chưa nhập nội dung. Hãy cho mình biết bạn cần gì nhé!".to_string()
}

pub fn cancelled(flow: Option<FlowKind>) -> String {
    match flow {
        Some(FlowKind::Appointment) => {
            "❌ Đã hủy đặt lịch. Nếu bạn muốn đặt lại, hãy nói \"đặt lịch khám\".".to_string()
        }
        Some(FlowKind::CheckIn | FlowKind::QueueStatus | FlowKind::Reissue) => {
            "✅ Đã hủy quy trình hàng đợi. Bạn muốn **check-in** hay **xem trạng thái**?".to_string()
        }
        _ => "✅ Đã làm mới cuộc trò chuyện. Bạn cần mình giúp gì?".to_string(),
    }
}

pub fn disambiguation(candidates: &[FlowKind]) -> String {
    let options = candidates
        .iter()
        .enumerate()
        .map(|(i, kind)| format!("{}. {}", i + 1, kind.label()))
        .collect::<Vec<_>>()
        .join("\n");
    format!("🤔 Mình chưa rõ bạn muốn làm gì:\n\n{options}\n\nBạn hãy nói rõ một việc giúp mình nhé.")
}

pub fn session_expired_note() -> &'static str {
    "⌛ Phiên trước đã hết hạn nên mình bắt đầu lại từ đầu.\n\n"
}

// ════════════════════════════════════════════════════════════════════════════
// Appointment booking
// ════════════════════════════════════════════════════════════════════════════

pub fn facility_menu(facilities: &[Facility]) -> String {
    format!(
        "🏥 **Đặt lịch khám bệnh**\n\nVui lòng chọn bệnh viện bạn muốn khám:\n\n{}\n\nVui lòng nhập số thứ tự (1-{}) hoặc tên bệnh viện.",
        numbered_menu(facilities),
        facilities.len()
    )
}

pub fn facility_not_found(facilities: &[Facility]) -> String {
    format!("❌ Không tìm thấy bệnh viện. Vui lòng chọn lại:\n\n{}", facility_menu(facilities))
}

pub fn facility_has_no_practitioners(facility: &Facility, facilities: &[Facility]) -> String {
    format!(
        "❌ {} hiện chưa nhận đặt lịch. Vui lòng chọn bệnh viện khác:\n\n{}",
        facility.name,
        facility_menu(facilities)
    )
}

pub fn practitioner_menu(practitioners: &[Practitioner]) -> String {
    format!(
        "👨‍⚕️ **Chọn bác sĩ:**\n\n{}\n\nVui lòng nhập số thứ tự (1-{}) hoặc tên bác sĩ.",
        numbered_menu(practitioners),
        practitioners.len()
    )
}

pub fn facility_chosen(facility: &Facility, practitioners: &[Practitioner]) -> String {
    format!(
        "✅ Đã chọn: **{}**\n📍 {}\n📞 {}\n\n{}",
        facility.name,
        facility.address,
        facility.phone,
        practitioner_menu(practitioners)
    )
}

pub fn practitioner_not_found(practitioners: &[Practitioner]) -> String {
    format!("❌ Lựa chọn không hợp lệ. Vui lòng chọn lại:\n\n{}", practitioner_menu(practitioners))
}

pub fn date_prompt() -> &'static str {
    "📅 **Chọn ngày khám**\n\nVui lòng nhập ngày khám theo định dạng: DD/MM/YYYY\n(Ví dụ: 25/12/2025)"
}

pub fn practitioner_chosen(practitioner: &Practitioner) -> String {
    format!(
        "✅ Đã chọn: **{}**\n📞 {}\n\n{}",
        practitioner.name,
        practitioner.phone,
        date_prompt()
    )
}

pub fn invalid_date_format() -> String {
    format!("❌ Định dạng ngày không hợp lệ.\n\n{}", date_prompt())
}

pub fn date_in_past() -> String {
    format!("❌ Ngày khám phải là hôm nay hoặc một ngày trong tương lai.\n\n{}", date_prompt())
}

pub fn time_menu(slots: &SlotTable) -> String {
    let render = |group: &[(usize, TimeSlot)]| {
        group
            .iter()
            .map(|(n, slot)| format!("{n}. {slot}"))
            .collect::<Vec<_>>()
            .join(", ")
    };
    let (morning, afternoon) = slots.grouped();
    let mut out = String::from("⏰ **Chọn giờ khám:**\n\n");
    if !morning.is_empty() {
        out.push_str(&format!("🌅 **Buổi sáng:**\n{}\n\n", render(&morning)));
    }
    if !afternoon.is_empty() {
        out.push_str(&format!("🌆 **Buổi chiều:**\n{}\n\n", render(&afternoon)));
    }
    out.push_str(&format!(
        "Vui lòng nhập số thứ tự (1-{}) hoặc giờ (VD: 09:00)",
        slots.len()
    ));
    out
}

pub fn date_chosen(date: NaiveDate, slots: &SlotTable) -> String {
    format!("✅ Đã chọn ngày: **{}**\n\n{}", date.format("%d/%m/%Y"), time_menu(slots))
}

pub fn invalid_time(slots: &SlotTable) -> String {
    format!("❌ Giờ không hợp lệ.\n\n{}", time_menu(slots))
}

pub fn time_already_passed(slot: TimeSlot, slots: &SlotTable) -> String {
    format!(
        "❌ Khung giờ {slot} hôm nay đã qua. Vui lòng chọn giờ khác.\n\n{}",
        time_menu(slots)
    )
}

pub fn name_prompt() -> &'static str {
    "👤 **Thông tin bệnh nhân**\n\nVui lòng nhập họ tên của bạn:"
}

pub fn time_chosen(slot: TimeSlot) -> String {
    format!("✅ Đã chọn giờ: **{slot}**\n\n{}", name_prompt())
}

pub fn invalid_patient_name() -> String {
    "❌ Họ tên cần gồm 2 đến 5 chữ, không có số. Vui lòng nhập lại họ tên của bạn:".to_string()
}

pub fn patient_name_saved(name: &str) -> String {
    format!("✅ Họ tên: **{name}**\n\n📱 Vui lòng nhập số điện thoại:")
}

pub fn invalid_booking_phone() -> String {
    "❌ Số điện thoại không hợp lệ. Vui lòng nhập số điện thoại 10 số (bắt đầu bằng 0):".to_string()
}

pub fn phone_saved(phone: &str) -> String {
    format!("✅ Số điện thoại: **{phone}**\n\n📧 Vui lòng nhập email:")
}

pub fn invalid_email() -> String {
    "❌ Email không hợp lệ. Vui lòng nhập lại:".to_string()
}

pub fn email_saved(email: &str) -> String {
    format!(
        "✅ Email: **{email}**\n\n📝 Vui lòng mô tả triệu chứng của bạn (hoặc gõ \"bỏ qua\" nếu không có):"
    )
}

/// Everything the confirmation summary shows.
#[derive(Debug, Clone, Copy)]
pub struct BookingSummary<'a> {
    pub facility: &'a str,
    pub practitioner: &'a str,
    pub date: NaiveDate,
    pub time: &'a str,
    pub patient_name: &'a str,
    pub patient_phone: &'a str,
    pub patient_email: &'a str,
    pub symptoms: Option<&'a str>,
}

pub fn confirm_summary(summary: &BookingSummary<'_>) -> String {
    let symptoms = summary
        .symptoms
        .map(|s| format!("\n• Triệu chứng: {s}"))
        .unwrap_or_default();
    format!(
        "📋 **Xác nhận thông tin đặt lịch:**\n\n\
         🏥 Bệnh viện: {}\n\
         👨‍⚕️ Bác sĩ: {}\n\
         📅 Ngày: {}\n\
         ⏰ Giờ: {}\n\n\
         👤 **Thông tin bệnh nhân:**\n\
         • Họ tên: {}\n\
         • SĐT: {}\n\
         • Email: {}{}\n\n\
         {}",
        summary.facility,
        summary.practitioner,
        summary.date.format("%d/%m/%Y"),
        summary.time,
        summary.patient_name,
        summary.patient_phone,
        summary.patient_email,
        symptoms,
        confirm_reminder()
    )
}

pub fn confirm_reminder() -> &'static str {
    "Gõ **\"xác nhận\"** để đặt lịch hoặc **\"hủy\"** để hủy bỏ."
}

pub fn booking_succeeded(receipt: &str) -> String {
    format!(
        "✅ **Đặt lịch thành công!**\n\n{receipt}\n\n\
         💡 Bệnh viện sẽ liên hệ với bạn sớm nhất để xác nhận lịch hẹn."
    )
}

pub fn booking_rejected(reason: &str) -> String {
    format!("❌ **Không thể đặt lịch:** {reason}\n\n{}", retry_hint())
}

pub fn slot_expired_at_confirm(slots: &SlotTable) -> String {
    format!(
        "⚠️ Khung giờ đã chọn không còn hợp lệ vì đã qua. Vui lòng chọn lại giờ khám.\n\n{}",
        time_menu(slots)
    )
}

pub fn date_expired_at_confirm() -> String {
    format!("⚠️ Ngày khám đã chọn đã qua. Vui lòng chọn lại.\n\n{}", date_prompt())
}

// ════════════════════════════════════════════════════════════════════════════
// Queue
// ════════════════════════════════════════════════════════════════════════════

pub fn ask_full_name() -> String {
    "👤 **Vui lòng cho mình biết họ tên của bạn.**\n\nVí dụ: \"Tên Nguyễn Văn A\"".to_string()
}

pub fn ask_queue_phone() -> String {
    "📱 **Vui lòng cung cấp số điện thoại của bạn.**\n\nVí dụ: \"Số điện thoại 0912345678\"".to_string()
}

pub fn ask_national_id() -> String {
    "🆔 **Vui lòng cung cấp số CMND/CCCD của bạn** (hoặc gõ \"bỏ qua\").\n\nVí dụ: \"CCCD 001234567890\"".to_string()
}

pub fn ask_queue_type(operation: QueueOperation) -> String {
    let heading = match operation {
        QueueOperation::CheckIn => "🎫 **Bạn muốn lấy số loại nào?**",
        QueueOperation::Status => "🎫 **Bạn muốn xem trạng thái số loại nào?**",
        QueueOperation::Reissue => "🔄 **Bạn muốn cấp lại số loại nào?**",
    };
    format!(
        "{heading}\n\n- **BHYT** - Khám theo bảo hiểm y tế\n- **Dịch vụ** - Khám dịch vụ\n\nVui lòng chọn: \"BHYT\" hoặc \"Dịch vụ\""
    )
}

pub fn invalid_full_name() -> String {
    "👤 Mình chưa thấy **họ tên** hợp lệ (2-5 chữ). Bạn gửi lại giúp mình nhé. Ví dụ: **Nguyễn Văn A**".to_string()
}

pub fn invalid_queue_phone() -> String {
    "📱 Mình chưa thấy **số điện thoại** hợp lệ (10-11 số). Bạn gửi lại giúp mình nhé. Ví dụ: **0912345678**".to_string()
}

pub fn invalid_national_id() -> String {
    "🆔 Mình chưa thấy **CMND/CCCD** hợp lệ (9 hoặc 12 số). Bạn gửi lại giúp mình nhé, hoặc gõ **\"bỏ qua\"**.".to_string()
}

pub fn invalid_queue_type() -> String {
    "🎫 Bạn chọn giúp mình: **BHYT** hoặc **Dịch vụ**".to_string()
}

pub fn check_in_succeeded(ticket: &str) -> String {
    format!(
        "✅ **Check-in thành công!**\n\n{ticket}\n\nBạn có thể hỏi \"trạng thái số của tôi\" bất cứ lúc nào!"
    )
}

pub fn reissue_succeeded(ticket: &str) -> String {
    format!("✅ **Cấp lại số thành công!**\n\n{ticket}\n\nVui lòng chú ý gọi số lần này nhé!")
}

pub fn queue_rejected(operation: QueueOperation, reason: &str) -> String {
    let heading = match operation {
        QueueOperation::CheckIn => "❌ **Không thể check-in**",
        QueueOperation::Status => "❌ **Không thể lấy thông tin trạng thái**",
        QueueOperation::Reissue => "❌ **Không thể cấp lại số**",
    };
    match operation {
        QueueOperation::Status => format!("{heading}\n\n{reason}"),
        _ => format!("{heading}\n\n{reason}\n\n{}", retry_hint()),
    }
}

pub fn status_not_found() -> String {
    "❌ **Không thể lấy thông tin trạng thái**\n\nBạn đã check-in chưa? Vui lòng thử lại.".to_string()
}

pub fn retry_reminder() -> String {
    format!("Yêu cầu trước chưa gửi được. {}", retry_hint())
}

// ════════════════════════════════════════════════════════════════════════════
// Lookups and gateway failures
// ════════════════════════════════════════════════════════════════════════════

pub fn no_billing_data() -> String {
    "ℹ️ Bạn chưa có dữ liệu viện phí nào trong hệ thống.".to_string()
}

pub fn billing_failed(reason: &str) -> String {
    format!("❌ Có lỗi xảy ra: {reason}")
}

pub fn no_appointments() -> String {
    "📭 Bạn chưa có lịch hẹn nào. Hãy nói \"đặt lịch khám\" để đặt lịch mới.".to_string()
}

pub fn appointments_failed(reason: &str) -> String {
    format!("❌ Không thể tải lịch hẹn: {reason}")
}

pub fn sign_in_required() -> String {
    "🔒 Vui lòng đăng nhập để sử dụng chức năng này.".to_string()
}

pub fn timed_out() -> String {
    "⏱️ Hệ thống phản hồi quá lâu nên yêu cầu đã bị hủy.".to_string()
}

pub fn timed_out_with_retry() -> String {
    format!("{} Thông tin bạn đã nhập vẫn được giữ nguyên.\n\n{}", timed_out(), retry_hint())
}

pub fn unreachable() -> String {
    "📡 Không thể kết nối tới hệ thống. Vui lòng kiểm tra kết nối và thử lại sau.".to_string()
}

pub fn unreachable_with_retry() -> String {
    format!("{}\n\n{}", unreachable(), retry_hint())
}

fn retry_hint() -> &'static str {
    "Gõ **\"xác nhận\"** hoặc **\"thử lại\"** để gửi lại, hoặc **\"hủy\"** để hủy bỏ."
}
