//! The closed set of wizard steps.

use serde::{Deserialize, Serialize};

use crate::domain::CaseId;

/// Which part of the journey a step belongs to. After signing, navigation is
/// limited by stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Overview,
    FillIn,
    Payment,
    Identity,
    Signing,
    Admin,
}

macro_rules! steps {
    ($($variant:ident => ($slug:literal, $stage:ident)),+ $(,)?) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum Step {
            $($variant),+
        }

        impl Step {
            pub const ALL: &'static [Step] = &[$(Step::$variant),+];

            /// URL slug, unique per step.
            pub fn slug(self) -> &'static str {
                match self {
                    $(Step::$variant => $slug),+
                }
            }

            pub fn stage(self) -> Stage {
                match self {
                    $(Step::$variant => Stage::$stage),+
                }
            }

            pub fn from_slug(slug: &str) -> Option<Step> {
                match slug {
                    $($slug => Some(Step::$variant),)+
                    _ => None,
                }
            }
        }
    };
}

steps! {
    TaskList => ("task-list", Overview),
    Progress => ("progress", Overview),

    YourDetails => ("your-details", FillIn),
    YourName => ("your-name", FillIn),
    YourDateOfBirth => ("your-date-of-birth", FillIn),
    YourAddress => ("your-address", FillIn),
    CanYouSignYourLpa => ("can-you-sign-your-lpa", FillIn),
    LpaType => ("lpa-type", FillIn),

    ChooseAttorneysGuidance => ("choose-attorneys-guidance", FillIn),
    ChooseAttorneys => ("choose-attorneys", FillIn),
    ChooseAttorneysAddress => ("choose-attorneys-address", FillIn),
    EnterTrustCorporation => ("enter-trust-corporation", FillIn),
    EnterTrustCorporationAddress => ("enter-trust-corporation-address", FillIn),
    ChooseAttorneysSummary => ("choose-attorneys-summary", FillIn),
    RemoveAttorney => ("remove-attorney", FillIn),
    HowShouldAttorneysMakeDecisions => ("how-should-attorneys-make-decisions", FillIn),
    BecauseYouHaveChosenJointly => ("because-you-have-chosen-jointly", FillIn),
    BecauseYouHaveChosenJointlyForSomeSeverallyForOthers =>
        ("because-you-have-chosen-jointly-for-some-severally-for-others", FillIn),

    DoYouWantReplacementAttorneys => ("do-you-want-replacement-attorneys", FillIn),
    ChooseReplacementAttorneys => ("choose-replacement-attorneys", FillIn),
    ChooseReplacementAttorneysAddress => ("choose-replacement-attorneys-address", FillIn),
    ChooseReplacementAttorneysSummary => ("choose-replacement-attorneys-summary", FillIn),
    RemoveReplacementAttorney => ("remove-replacement-attorney", FillIn),
    HowShouldReplacementAttorneysStepIn => ("how-should-replacement-attorneys-step-in", FillIn),
    HowShouldReplacementAttorneysMakeDecisions =>
        ("how-should-replacement-attorneys-make-decisions", FillIn),

    WhenCanTheLpaBeUsed => ("when-can-the-lpa-be-used", FillIn),
    LifeSustainingTreatment => ("life-sustaining-treatment", FillIn),
    Restrictions => ("restrictions", FillIn),

    WhatACertificateProviderDoes => ("what-a-certificate-provider-does", FillIn),
    CertificateProviderDetails => ("certificate-provider-details", FillIn),
    HowWouldCertificateProviderPreferToCarryOutTheirRole =>
        ("how-would-certificate-provider-prefer-to-carry-out-their-role", FillIn),
    CertificateProviderAddress => ("certificate-provider-address", FillIn),
    HowDoYouKnowYourCertificateProvider => ("how-do-you-know-your-certificate-provider", FillIn),
    HowLongHaveYouKnownCertificateProvider =>
        ("how-long-have-you-known-certificate-provider", FillIn),
    ChooseNewCertificateProvider => ("choose-new-certificate-provider", FillIn),
    CertificateProviderSummary => ("certificate-provider-summary", FillIn),

    DoYouWantToNotifyPeople => ("do-you-want-to-notify-people", FillIn),
    ChoosePeopleToNotify => ("choose-people-to-notify", FillIn),
    ChoosePeopleToNotifyAddress => ("choose-people-to-notify-address", FillIn),
    ChoosePeopleToNotifySummary => ("choose-people-to-notify-summary", FillIn),
    RemovePersonToNotify => ("remove-person-to-notify", FillIn),

    AddCorrespondent => ("add-correspondent", FillIn),
    EnterCorrespondentDetails => ("enter-correspondent-details", FillIn),

    GettingHelpSigning => ("getting-help-signing", FillIn),
    YourAuthorisedSignatory => ("your-authorised-signatory", FillIn),
    YourIndependentWitness => ("your-independent-witness", FillIn),

    YouCannotSignYourLpaYet => ("you-cannot-sign-your-lpa-yet", FillIn),
    ConfirmYourCertificateProviderIsNotRelated =>
        ("confirm-your-certificate-provider-is-not-related", FillIn),
    CheckYourLpa => ("check-your-lpa", FillIn),
    LpaDetailsSaved => ("lpa-details-saved", FillIn),

    AboutPayment => ("about-payment", Payment),
    AreYouApplyingForFeeDiscountOrExemption =>
        ("are-you-applying-for-fee-discount-or-exemption", Payment),
    WhichFeeTypeAreYouApplyingFor => ("which-fee-type-are-you-applying-for", Payment),
    EvidenceRequired => ("evidence-required", Payment),
    HowWouldYouLikeToSendEvidence => ("how-would-you-like-to-send-evidence", Payment),
    UploadEvidence => ("upload-evidence", Payment),
    SendUsYourEvidenceByPost => ("send-us-your-evidence-by-post", Payment),
    PayFee => ("pay-fee", Payment),
    PaymentConfirmation => ("payment-confirmation", Payment),
    PaymentSuccessful => ("payment-successful", Payment),
    EvidenceSuccessfullyUploaded => ("evidence-successfully-uploaded", Payment),
    PendingPayment => ("pending-payment", Payment),

    ConfirmYourIdentity => ("confirm-your-identity", Identity),
    HowWillYouConfirmYourIdentity => ("how-will-you-confirm-your-identity", Identity),
    CompletingYourIdentityConfirmation => ("completing-your-identity-confirmation", Identity),
    IdentityWithOneLogin => ("identity-with-one-login", Identity),
    IdentityWithOneLoginCallback => ("identity-with-one-login-callback", Identity),
    IdentityDetails => ("identity-details", Identity),
    UnableToConfirmIdentity => ("unable-to-confirm-identity", Identity),
    ChooseSomeoneToVouchForYou => ("choose-someone-to-vouch-for-you", Identity),
    EnterVoucher => ("enter-voucher", Identity),
    WeHaveContactedVoucher => ("we-have-contacted-voucher", Identity),
    WhatYouCanDoNow => ("what-you-can-do-now", Identity),
    WhatYouCanDoNowExpired => ("what-you-can-do-now-expired", Identity),
    AreYouSureYouNoLongerNeedVoucher => ("are-you-sure-you-no-longer-need-voucher", Identity),
    RegisterWithCourtOfProtection => ("register-with-court-of-protection", Identity),
    WhatHappensNextRegisteringWithCourtOfProtection =>
        ("what-happens-next-registering-with-court-of-protection", Identity),

    HowToSignYourLpa => ("how-to-sign-your-lpa", Signing),
    ReadYourLpa => ("read-your-lpa", Signing),
    LpaYourLegalRightsAndResponsibilities =>
        ("your-legal-rights-and-responsibilities", Signing),
    SignYourLpa => ("sign-your-lpa", Signing),
    SignTheLpaOnBehalf => ("sign-the-lpa-on-behalf", Signing),
    WitnessingYourSignature => ("witnessing-your-signature", Signing),
    WitnessingAsCertificateProvider => ("witnessing-as-certificate-provider", Signing),
    WitnessingAsIndependentWitness => ("witnessing-as-independent-witness", Signing),

    YouHaveSubmittedYourLpa => ("you-have-submitted-your-lpa", Admin),
    ViewLpa => ("view-lpa", Admin),
    DeleteThisLpa => ("delete-this-lpa", Admin),
    WithdrawThisLpa => ("withdraw-this-lpa", Admin),
    WarningInterruption => ("warning-interruption", Admin),
}

impl Step {
    /// Display path for this step within a case.
    pub fn path(self, case_id: &CaseId) -> String {
        format!("/lpa/{}/{}", case_id, self.slug())
    }
}

impl std::fmt::Display for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.slug())
    }
}
