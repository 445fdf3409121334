//! Appointment booking controller.
//!
//! Walks facility, practitioner, date, time, patient details and symptoms in
//! order, then submits once on an explicit confirmation.

use chrono::NaiveDate;
use std::sync::Arc;

use super::turn::{required, submission_failure, DialogueError, Entry, Turn};
use crate::domain::catalog::{select_by_index_or_name, TimeSlot};
use crate::domain::dialogue::extractor::{
    extract_date, extract_email, extract_full_name, extract_time_slot, is_confirmation, is_skip,
    parse_calendar_date, parse_phone_strict,
};
use crate::domain::dialogue::prompts::{self, BookingSummary};
use crate::domain::dialogue::{
    AppointmentStep, AppointmentView, ConversationContext, Flow, ResponseFormatter, SlotField,
};
use crate::domain::foundation::StateMachine;
use crate::domain::records::AppointmentRequest;
use crate::ports::{ClinicGateway, ReferenceData};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Fields that, once collected, let a re-picked slot go straight to confirmation.
const PATIENT_FIELDS: [SlotField; 4] = [
    SlotField::PatientName,
    SlotField::Phone,
    SlotField::Email,
    SlotField::Symptoms,
];

pub struct AppointmentFlow {
    gateway: Arc<dyn ClinicGateway>,
    catalog: Arc<dyn ReferenceData>,
    formatter: ResponseFormatter,
}

impl AppointmentFlow {
    pub fn new(
        gateway: Arc<dyn ClinicGateway>,
        catalog: Arc<dyn ReferenceData>,
        formatter: ResponseFormatter,
    ) -> Self {
        Self {
            gateway,
            catalog,
            formatter,
        }
    }

    pub async fn handle(
        &self,
        turn: &Turn<'_>,
        context: &mut ConversationContext,
        entry: Entry,
    ) -> Result<String, DialogueError> {
        let step = match context.flow {
            Flow::Appointment { step } => step,
            other => return Err(DialogueError::FlowMismatch(other)),
        };

        if entry == Entry::Fresh {
            let first = AppointmentStep::SelectFacility;
            context.await_field(Flow::Appointment { step: first }, first.pending_field());
            return Ok(prompts::facility_menu(self.catalog.facilities()));
        }

        match step {
            AppointmentStep::SelectFacility => self.select_facility(turn, context),
            AppointmentStep::SelectPractitioner => self.select_practitioner(turn, context),
            AppointmentStep::SelectDate => self.select_date(turn, context),
            AppointmentStep::SelectTime => self.select_time(turn, context),
            AppointmentStep::EnterName => self.enter_name(turn, context),
            AppointmentStep::EnterPhone => self.enter_phone(turn, context),
            AppointmentStep::EnterEmail => self.enter_email(turn, context),
            AppointmentStep::EnterSymptoms => self.enter_symptoms(turn, context),
            AppointmentStep::Confirm => self.confirm(turn, context).await,
        }
    }

    fn select_facility(
        &self,
        turn: &Turn<'_>,
        context: &mut ConversationContext,
    ) -> Result<String, DialogueError> {
        let facilities = self.catalog.facilities();
        let Some(facility) = select_by_index_or_name(facilities, turn.utterance) else {
            return Ok(prompts::facility_not_found(facilities));
        };

        let practitioners = self.catalog.practitioners(&facility.id);
        if practitioners.is_empty() {
            return Ok(prompts::facility_has_no_practitioners(facility, facilities));
        }

        context.collected.insert(SlotField::Facility, facility.id.clone());
        advance(context, AppointmentStep::SelectFacility, AppointmentStep::SelectPractitioner)?;
        Ok(prompts::facility_chosen(facility, practitioners))
    }

    fn select_practitioner(
        &self,
        turn: &Turn<'_>,
        context: &mut ConversationContext,
    ) -> Result<String, DialogueError> {
        let facility_id = required(context, SlotField::Facility)?;
        let practitioners = self.catalog.practitioners(&facility_id);
        let Some(practitioner) = select_by_index_or_name(practitioners, turn.utterance) else {
            return Ok(prompts::practitioner_not_found(practitioners));
        };

        context
            .collected
            .insert(SlotField::Practitioner, practitioner.id.clone());
        advance(context, AppointmentStep::SelectPractitioner, AppointmentStep::SelectDate)?;
        Ok(prompts::practitioner_chosen(practitioner))
    }

    fn select_date(
        &self,
        turn: &Turn<'_>,
        context: &mut ConversationContext,
    ) -> Result<String, DialogueError> {
        let Some(date) = extract_date(turn.utterance, turn.today) else {
            return Ok(match parse_calendar_date(turn.utterance) {
                Some(_) => prompts::date_in_past(),
                None => prompts::invalid_date_format(),
            });
        };

        context
            .collected
            .insert(SlotField::Date, date.format(DATE_FORMAT).to_string());
        advance(context, AppointmentStep::SelectDate, AppointmentStep::SelectTime)?;
        Ok(prompts::date_chosen(date, self.catalog.time_slots()))
    }

    fn select_time(
        &self,
        turn: &Turn<'_>,
        context: &mut ConversationContext,
    ) -> Result<String, DialogueError> {
        let slots = self.catalog.time_slots();
        let Some(slot) = extract_time_slot(turn.utterance, slots) else {
            return Ok(prompts::invalid_time(slots));
        };

        let date = collected_date(context)?;
        if slot_has_passed(turn, date, slot) {
            return Ok(prompts::time_already_passed(slot, slots));
        }

        context.collected.insert(SlotField::Time, slot.to_string());

        if PATIENT_FIELDS.iter().all(|f| context.collected.contains(*f)) {
            advance(context, AppointmentStep::SelectTime, AppointmentStep::Confirm)?;
            return self.summary(context);
        }

        advance(context, AppointmentStep::SelectTime, AppointmentStep::EnterName)?;
        Ok(prompts::time_chosen(slot))
    }

    fn enter_name(
        &self,
        turn: &Turn<'_>,
        context: &mut ConversationContext,
    ) -> Result<String, DialogueError> {
        let Some(name) = extract_full_name(turn.utterance, true) else {
            return Ok(prompts::invalid_patient_name());
        };

        let reply = prompts::patient_name_saved(&name);
        context.collected.insert(SlotField::PatientName, name);
        advance(context, AppointmentStep::EnterName, AppointmentStep::EnterPhone)?;
        Ok(reply)
    }

    fn enter_phone(
        &self,
        turn: &Turn<'_>,
        context: &mut ConversationContext,
    ) -> Result<String, DialogueError> {
        let Some(phone) = parse_phone_strict(turn.utterance) else {
            return Ok(prompts::invalid_booking_phone());
        };

        let reply = prompts::phone_saved(&phone);
        context.collected.insert(SlotField::Phone, phone);
        advance(context, AppointmentStep::EnterPhone, AppointmentStep::EnterEmail)?;
        Ok(reply)
    }

    fn enter_email(
        &self,
        turn: &Turn<'_>,
        context: &mut ConversationContext,
    ) -> Result<String, DialogueError> {
        let Some(email) = extract_email(turn.utterance) else {
            return Ok(prompts::invalid_email());
        };

        let reply = prompts::email_saved(&email);
        context.collected.insert(SlotField::Email, email);
        advance(context, AppointmentStep::EnterEmail, AppointmentStep::EnterSymptoms)?;
        Ok(reply)
    }

    fn enter_symptoms(
        &self,
        turn: &Turn<'_>,
        context: &mut ConversationContext,
    ) -> Result<String, DialogueError> {
        if is_skip(turn.utterance) {
            context.collected.skip(SlotField::Symptoms);
        } else {
            context
                .collected
                .insert(SlotField::Symptoms, turn.utterance.trim());
        }

        advance(context, AppointmentStep::EnterSymptoms, AppointmentStep::Confirm)?;
        self.summary(context)
    }

    async fn confirm(
        &self,
        turn: &Turn<'_>,
        context: &mut ConversationContext,
    ) -> Result<String, DialogueError> {
        if !is_confirmation(turn.utterance) {
            return Ok(prompts::confirm_reminder().to_string());
        }

        let request = self.build_request(context)?;

        // The clock may have moved since the slot was picked.
        if request.date < turn.today {
            advance(context, AppointmentStep::Confirm, AppointmentStep::SelectDate)?;
            return Ok(prompts::date_expired_at_confirm());
        }
        if slot_has_passed(turn, request.date, request.time) {
            advance(context, AppointmentStep::Confirm, AppointmentStep::SelectTime)?;
            return Ok(prompts::slot_expired_at_confirm(self.catalog.time_slots()));
        }

        tracing::info!(
            conversation_id = %context.conversation_id,
            facility_id = %request.facility_id,
            practitioner_id = %request.practitioner_id,
            "Submitting appointment"
        );

        match self
            .gateway
            .create_appointment(&request, turn.access_token)
            .await
        {
            Ok(appointment) => {
                let receipt = self.formatter.appointment(AppointmentView {
                    appointment: &appointment,
                    facility: self.catalog.facility(&appointment.facility_id),
                    practitioner: self
                        .catalog
                        .practitioner(&appointment.facility_id, &appointment.practitioner_id),
                });
                tracing::info!(
                    conversation_id = %context.conversation_id,
                    appointment_id = %appointment.appointment_id,
                    "Appointment created"
                );
                context.complete(Some(appointment.appointment_id));
                Ok(prompts::booking_succeeded(&receipt))
            }
            Err(err) => {
                tracing::warn!(
                    conversation_id = %context.conversation_id,
                    kind = err.kind(),
                    "Appointment submission failed"
                );
                submission_failure(err, prompts::booking_rejected)
            }
        }
    }

    /// Confirmation summary of everything collected so far.
    fn summary(&self, context: &ConversationContext) -> Result<String, DialogueError> {
        let request = self.build_request(context)?;
        let facility = self
            .catalog
            .facility(&request.facility_id)
            .ok_or_else(|| DialogueError::UnknownCatalogEntry(request.facility_id.clone()))?;
        let practitioner = self
            .catalog
            .practitioner(&request.facility_id, &request.practitioner_id)
            .ok_or_else(|| DialogueError::UnknownCatalogEntry(request.practitioner_id.clone()))?;
        let time = request.time.to_string();

        Ok(prompts::confirm_summary(&BookingSummary {
            facility: &facility.name,
            practitioner: &practitioner.name,
            date: request.date,
            time: &time,
            patient_name: &request.patient_name,
            patient_phone: &request.patient_phone,
            patient_email: &request.patient_email,
            symptoms: request.symptoms.as_deref(),
        }))
    }

    fn build_request(&self, context: &ConversationContext) -> Result<AppointmentRequest, DialogueError> {
        let time = required(context, SlotField::Time)?
            .parse::<TimeSlot>()
            .map_err(|_| DialogueError::MalformedField(SlotField::Time))?;

        Ok(AppointmentRequest {
            facility_id: required(context, SlotField::Facility)?,
            practitioner_id: required(context, SlotField::Practitioner)?,
            date: collected_date(context)?,
            time,
            patient_name: required(context, SlotField::PatientName)?,
            patient_phone: required(context, SlotField::Phone)?,
            patient_email: required(context, SlotField::Email)?,
            symptoms: context
                .collected
                .value(SlotField::Symptoms)
                .map(str::to_string),
        })
    }
}

fn advance(
    context: &mut ConversationContext,
    from: AppointmentStep,
    to: AppointmentStep,
) -> Result<(), DialogueError> {
    let step = from.transition_to(to)?;
    context.await_field(Flow::Appointment { step }, step.pending_field());
    Ok(())
}

fn collected_date(context: &ConversationContext) -> Result<NaiveDate, DialogueError> {
    let raw = required(context, SlotField::Date)?;
    NaiveDate::parse_from_str(&raw, DATE_FORMAT)
        .map_err(|_| DialogueError::MalformedField(SlotField::Date))
}

/// A slot today at or before the current local time can no longer be booked.
fn slot_has_passed(turn: &Turn<'_>, date: NaiveDate, slot: TimeSlot) -> bool {
    date == turn.today && slot.as_time() <= turn.local_time
}
