//! Handlers for commands that change what the document says.

use chrono::NaiveDate;

use crate::change_fingerprint::mark_certificate_provider_not_related;
use crate::config::EngineConfig;
use crate::domain::name_warning::unacknowledged_warning;
use crate::domain::{
    ActorKind, ActorUid, Address, Application, Attorneys, DecisionMode, Decisions, EngineError,
    LpaType, ReplacementStepIn, Result, Roster, Section, TimestampUtc, YesNo,
};
use crate::state_machine::commands::{AttorneyParty, StepCommand};
use crate::state_machine::events::StepEvent;

fn require_names(first_names: &str, last_name: &str) -> Result<()> {
    if first_names.trim().is_empty() {
        return Err(EngineError::validation("first_names", "enter first names"));
    }
    if last_name.trim().is_empty() {
        return Err(EngineError::validation("last_name", "enter a last name"));
    }
    Ok(())
}

fn require_address(address: &Address) -> Result<()> {
    if !address.is_present() {
        return Err(EngineError::validation("address", "enter the first line of the address"));
    }
    Ok(())
}

fn require_past(date_of_birth: Option<NaiveDate>, now: TimestampUtc) -> Result<()> {
    match date_of_birth {
        Some(dob) if dob > now.date() => Err(EngineError::validation(
            "date_of_birth",
            "date of birth must be in the past",
        )),
        _ => Ok(()),
    }
}

fn check_same_name(
    app: &Application,
    entering: ActorKind,
    uid: ActorUid,
    first_names: &str,
    last_name: &str,
    acknowledged: Option<&str>,
) -> Result<()> {
    match unacknowledged_warning(app, entering, uid, first_names, last_name, acknowledged) {
        Some(warning) => Err(EngineError::NameWarning(warning)),
        None => Ok(()),
    }
}

fn attorneys_mut(app: &mut Application, party: AttorneyParty) -> &mut Attorneys {
    match party {
        AttorneyParty::Primary => &mut app.attorneys,
        AttorneyParty::Replacement => &mut app.replacement_attorneys,
    }
}

fn decisions_mut(app: &mut Application, party: AttorneyParty) -> &mut Decisions {
    match party {
        AttorneyParty::Primary => &mut app.attorney_decisions,
        AttorneyParty::Replacement => &mut app.replacement_attorney_decisions,
    }
}

fn recorded(section: Section, field: &'static str) -> Vec<StepEvent> {
    vec![StepEvent::AnswerRecorded { section, field }]
}

fn put_event(section: Section, uid: ActorUid, added: bool) -> StepEvent {
    if added {
        StepEvent::MemberAdded { section, uid }
    } else {
        StepEvent::MemberUpdated { section, uid }
    }
}

fn remove_member<T: crate::domain::Member>(
    roster: &mut Roster<T>,
    section: Section,
    uid: ActorUid,
) -> Result<Vec<StepEvent>> {
    roster
        .remove(uid)
        .ok_or(EngineError::UnknownMember { uid })?;
    Ok(vec![StepEvent::MemberRemoved { section, uid }])
}

/// Applies a command that edits document content.
pub(super) fn apply(
    app: &mut Application,
    command: StepCommand,
    config: &EngineConfig,
    now: TimestampUtc,
) -> Result<Vec<StepEvent>> {
    use StepCommand::*;

    match command {
        SetDonorName {
            first_names,
            last_name,
            other_names,
            acknowledged_warning,
        } => {
            if !app.can_change_personal_details() {
                return Err(EngineError::validation(
                    "first_names",
                    "name cannot be changed once identity checks have begun",
                ));
            }
            require_names(&first_names, &last_name)?;
            let uid = app.donor.uid;
            check_same_name(
                app,
                ActorKind::Donor,
                uid,
                &first_names,
                &last_name,
                acknowledged_warning.as_deref(),
            )?;
            app.donor.first_names = first_names.trim().to_string();
            app.donor.last_name = last_name.trim().to_string();
            app.donor.other_names = other_names.trim().to_string();
            Ok(recorded(Section::YourDetails, "name"))
        }

        SetDonorDateOfBirth { date_of_birth } => {
            if !app.can_change_personal_details() {
                return Err(EngineError::validation(
                    "date_of_birth",
                    "date of birth cannot be changed once identity checks have begun",
                ));
            }
            require_past(Some(date_of_birth), now)?;
            app.donor.date_of_birth = Some(date_of_birth);
            Ok(recorded(Section::YourDetails, "date_of_birth"))
        }

        SetDonorAddress { address } => {
            require_address(&address)?;
            app.donor.address = address;
            Ok(recorded(Section::YourDetails, "address"))
        }

        SetCanSign { can_sign } => {
            app.donor.can_sign = Some(can_sign);
            Ok(recorded(Section::YourDetails, "can_sign"))
        }

        SetLpaType { lpa_type } => {
            app.lpa_type = Some(lpa_type);
            Ok(recorded(Section::YourDetails, "lpa_type"))
        }

        PutAttorney {
            party,
            attorney,
            acknowledged_warning,
        } => {
            require_names(&attorney.first_names, &attorney.last_name)?;
            require_past(attorney.date_of_birth, now)?;
            check_same_name(
                app,
                party.actor_kind(),
                attorney.uid,
                &attorney.first_names,
                &attorney.last_name,
                acknowledged_warning.as_deref(),
            )?;
            let uid = attorney.uid;
            let added = attorneys_mut(app, party).members.put(attorney);
            Ok(vec![put_event(party.section(), uid, added)])
        }

        SetAttorneyAddress {
            party,
            uid,
            address,
        } => {
            require_address(&address)?;
            let attorney = attorneys_mut(app, party)
                .members
                .get_mut(uid)
                .ok_or(EngineError::UnknownMember { uid })?;
            attorney.address = address;
            Ok(vec![StepEvent::MemberUpdated {
                section: party.section(),
                uid,
            }])
        }

        RemoveAttorney { party, uid } => {
            remove_member(&mut attorneys_mut(app, party).members, party.section(), uid)
        }

        ReorderAttorneys { party, order } => {
            attorneys_mut(app, party).members.reorder(&order);
            Ok(vec![StepEvent::MembersReordered {
                section: party.section(),
            }])
        }

        PutTrustCorporation {
            party,
            trust_corporation,
        } => {
            if trust_corporation.name.trim().is_empty() {
                return Err(EngineError::validation("name", "enter the trust corporation name"));
            }
            let uid = trust_corporation.uid;
            let slot = &mut attorneys_mut(app, party).trust_corporation;
            let added = !matches!(slot, Some(existing) if existing.uid == uid);
            *slot = Some(trust_corporation);
            Ok(vec![put_event(party.section(), uid, added)])
        }

        RemoveTrustCorporation { party } => {
            let removed = attorneys_mut(app, party).trust_corporation.take().ok_or_else(|| {
                EngineError::validation("trust_corporation", "there is no trust corporation")
            })?;
            Ok(vec![StepEvent::MemberRemoved {
                section: party.section(),
                uid: removed.uid,
            }])
        }

        SetDecisions {
            party,
            mode,
            details,
        } => {
            if attorneys_mut(app, party).len() < 2 {
                return Err(EngineError::validation(
                    "decisions",
                    "decisions are only needed for more than one attorney",
                ));
            }
            let mixed = mode == DecisionMode::JointlyForSomeSeverallyForOthers;
            match mode {
                DecisionMode::Solely => {
                    return Err(EngineError::validation(
                        "decisions",
                        "choose how the attorneys should make decisions together",
                    ))
                }
                _ if mixed && details.trim().is_empty() => {
                    return Err(EngineError::validation(
                        "details",
                        "explain which decisions are made jointly",
                    ))
                }
                _ => {}
            }
            let decisions = decisions_mut(app, party);
            decisions.mode_changed = decisions.mode != Some(mode);
            decisions.mode = Some(mode);
            decisions.details = if mixed {
                details.trim().to_string()
            } else {
                String::new()
            };
            Ok(recorded(party.section(), "decisions"))
        }

        SetWantReplacementAttorneys { answer } => {
            app.want_replacement_attorneys = Some(answer);
            if answer == YesNo::No {
                app.replacement_attorneys = Attorneys::default();
            }
            Ok(recorded(
                Section::ChooseReplacementAttorneys,
                "want_replacement_attorneys",
            ))
        }

        SetReplacementStepIn { step_in, details } => {
            if app.replacement_attorneys.is_empty() {
                return Err(EngineError::validation(
                    "step_in",
                    "add a replacement attorney first",
                ));
            }
            let another_way = step_in == ReplacementStepIn::AnotherWay;
            if another_way && details.trim().is_empty() {
                return Err(EngineError::validation(
                    "details",
                    "explain how the replacement attorneys should step in",
                ));
            }
            app.replacement_step_in = Some(step_in);
            app.replacement_step_in_details = if another_way {
                details.trim().to_string()
            } else {
                String::new()
            };
            Ok(recorded(Section::ChooseReplacementAttorneys, "step_in"))
        }

        SetWhenCanBeUsed { when } => {
            if app.lpa_type != Some(LpaType::PropertyAndAffairs) {
                return Err(EngineError::validation(
                    "when_can_be_used",
                    "only applies to a property and affairs LPA",
                ));
            }
            app.when_can_be_used = Some(when);
            Ok(recorded(Section::UsageConditions, "when_can_be_used"))
        }

        SetLifeSustainingTreatment { option } => {
            if app.lpa_type != Some(LpaType::PersonalWelfare) {
                return Err(EngineError::validation(
                    "life_sustaining_treatment",
                    "only applies to a personal welfare LPA",
                ));
            }
            app.life_sustaining_treatment = Some(option);
            Ok(recorded(Section::UsageConditions, "life_sustaining_treatment"))
        }

        SetRestrictions { restrictions } => {
            app.restrictions = Some(restrictions.trim().to_string());
            Ok(recorded(Section::Restrictions, "restrictions"))
        }

        SetCertificateProviderName {
            first_names,
            last_name,
            mobile,
            acknowledged_warning,
        } => {
            require_names(&first_names, &last_name)?;
            let uid = app.certificate_provider.uid;
            check_same_name(
                app,
                ActorKind::CertificateProvider,
                uid,
                &first_names,
                &last_name,
                acknowledged_warning.as_deref(),
            )?;
            let cp = &mut app.certificate_provider;
            cp.first_names = first_names.trim().to_string();
            cp.last_name = last_name.trim().to_string();
            cp.mobile = mobile.trim().to_string();
            Ok(recorded(Section::CertificateProvider, "name"))
        }

        SetCertificateProviderChannel { channel, email } => {
            if channel == crate::domain::Channel::Online && email.trim().is_empty() {
                return Err(EngineError::validation(
                    "email",
                    "enter an email address to carry out the role online",
                ));
            }
            let cp = &mut app.certificate_provider;
            cp.channel = Some(channel);
            cp.email = email.trim().to_string();
            Ok(recorded(Section::CertificateProvider, "channel"))
        }

        SetCertificateProviderAddress { address } => {
            require_address(&address)?;
            app.certificate_provider.address = address;
            Ok(recorded(Section::CertificateProvider, "address"))
        }

        SetCertificateProviderRelationship { relationship } => {
            let cp = &mut app.certificate_provider;
            cp.relationship = Some(relationship);
            if relationship == crate::domain::RelationshipKind::Professionally {
                cp.relationship_length = None;
            }
            Ok(recorded(Section::CertificateProvider, "relationship"))
        }

        SetCertificateProviderRelationshipLength { length } => {
            app.certificate_provider.relationship_length = Some(length);
            Ok(recorded(Section::CertificateProvider, "relationship_length"))
        }

        ConfirmCertificateProviderNotRelated => {
            mark_certificate_provider_not_related(app, now);
            Ok(vec![StepEvent::CertificateProviderNotRelatedConfirmed])
        }

        SetWantPeopleToNotify { answer } => {
            app.want_people_to_notify = Some(answer);
            if answer == YesNo::No {
                app.people_to_notify = Roster::new();
            }
            Ok(recorded(Section::PeopleToNotify, "want_people_to_notify"))
        }

        PutPersonToNotify {
            person,
            acknowledged_warning,
        } => {
            require_names(&person.first_names, &person.last_name)?;
            let uid = person.uid;
            let is_new = !app.people_to_notify.contains(uid);
            if is_new && app.people_to_notify.len() >= config.max_people_to_notify {
                return Err(EngineError::validation(
                    "people_to_notify",
                    format!("you can add at most {} people", config.max_people_to_notify),
                ));
            }
            check_same_name(
                app,
                ActorKind::PersonToNotify,
                uid,
                &person.first_names,
                &person.last_name,
                acknowledged_warning.as_deref(),
            )?;
            let added = app.people_to_notify.put(person);
            Ok(vec![put_event(Section::PeopleToNotify, uid, added)])
        }

        SetPersonToNotifyAddress { uid, address } => {
            require_address(&address)?;
            let person = app
                .people_to_notify
                .get_mut(uid)
                .ok_or(EngineError::UnknownMember { uid })?;
            person.address = address;
            Ok(vec![StepEvent::MemberUpdated {
                section: Section::PeopleToNotify,
                uid,
            }])
        }

        RemovePersonToNotify { uid } => {
            remove_member(&mut app.people_to_notify, Section::PeopleToNotify, uid)
        }

        SetAddCorrespondent { answer } => {
            app.add_correspondent = Some(answer);
            if answer == YesNo::No {
                app.correspondent = Default::default();
            }
            Ok(recorded(Section::AddCorrespondent, "add_correspondent"))
        }

        SetCorrespondent { correspondent } => {
            require_names(&correspondent.first_names, &correspondent.last_name)?;
            if correspondent.email.trim().is_empty() {
                return Err(EngineError::validation("email", "enter an email address"));
            }
            app.correspondent = correspondent;
            Ok(recorded(Section::AddCorrespondent, "correspondent"))
        }

        SetAuthorisedSignatory {
            signatory,
            acknowledged_warning,
        } => {
            require_donor_cannot_sign(app)?;
            require_names(&signatory.first_names, &signatory.last_name)?;
            check_same_name(
                app,
                ActorKind::AuthorisedSignatory,
                signatory.uid,
                &signatory.first_names,
                &signatory.last_name,
                acknowledged_warning.as_deref(),
            )?;
            app.authorised_signatory = signatory;
            Ok(recorded(Section::ChooseYourSignatory, "authorised_signatory"))
        }

        SetIndependentWitness {
            witness,
            acknowledged_warning,
        } => {
            require_donor_cannot_sign(app)?;
            require_names(&witness.first_names, &witness.last_name)?;
            require_address(&witness.address)?;
            check_same_name(
                app,
                ActorKind::IndependentWitness,
                witness.uid,
                &witness.first_names,
                &witness.last_name,
                acknowledged_warning.as_deref(),
            )?;
            app.independent_witness = witness;
            Ok(recorded(Section::ChooseYourSignatory, "independent_witness"))
        }

        other => Err(EngineError::validation(
            "command",
            format!("{other:?} is not a document change"),
        )),
    }
}

fn require_donor_cannot_sign(app: &Application) -> Result<()> {
    if app.donor.cannot_sign() {
        Ok(())
    } else {
        Err(EngineError::validation(
            "can_sign",
            "only needed when the donor cannot sign",
        ))
    }
}
