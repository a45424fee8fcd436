//! Editing session: a decoupled working copy of one profile.
//!
use chrono::NaiveDate;

use crate::age;
use crate::data::{Gender, User};
use crate::error::ValidationError;

/// Minimum age accepted when saving.
pub const ADULT_AGE: u32 = 18;

/// Fields that can be changed while editing, in focus order.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum EditField {
    Dob,
    Age,
    Gender,
    Country,
    Description,
}

impl EditField {
    pub const ALL: [EditField; 5] = [
        EditField::Dob,
        EditField::Age,
        EditField::Gender,
        EditField::Country,
        EditField::Description,
    ];

    pub fn label(self) -> &'static str {
        match self {
            EditField::Dob => "Date of Birth",
            EditField::Age => "Age",
            EditField::Gender => "Gender",
            EditField::Country => "Country",
            EditField::Description => "Description",
        }
    }

    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|f| *f == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        let idx = Self::ALL.iter().position(|f| *f == self).unwrap_or(0);
        Self::ALL[(idx + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

/// Working copy of a [`User`] under edit.
///
/// `age` is kept as the raw text typed by the user; it only becomes a number
/// when the session is committed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EditedUser {
    pub id: u32,
    pub first: String,
    pub last: String,
    pub picture: String,
    pub dob: String,
    pub age: String,
    pub gender: Gender,
    pub country: String,
    pub description: String,
}

impl EditedUser {
    pub fn from_user(u: &User) -> Self {
        Self {
            id: u.id,
            first: u.first.clone(),
            last: u.last.clone(),
            picture: u.picture.clone(),
            dob: u.dob.clone(),
            age: u.age.to_string(),
            gender: u.gender,
            country: u.country.clone(),
            description: u.description.clone(),
        }
    }

    /// Current text of `field`.
    pub fn value(&self, field: EditField) -> &str {
        match field {
            EditField::Dob => &self.dob,
            EditField::Age => &self.age,
            EditField::Gender => self.gender.label(),
            EditField::Country => &self.country,
            EditField::Description => &self.description,
        }
    }

    /// Overwrite `field` with `value`. A new date of birth also overwrites
    /// the age; an unparseable date leaves the age empty.
    pub fn set(&mut self, field: EditField, value: &str, today: NaiveDate) {
        match field {
            EditField::Dob => {
                self.dob = value.to_string();
                self.age = age::age_from_str(value, today)
                    .map(|a| a.to_string())
                    .unwrap_or_default();
            }
            EditField::Age => self.age = value.to_string(),
            EditField::Gender => {
                if let Some(g) = Gender::from_label(value) {
                    self.gender = g;
                }
            }
            EditField::Country => self.country = value.to_string(),
            EditField::Description => self.description = value.to_string(),
        }
    }

    /// Check the save rules and build the record to commit.
    ///
    /// The country is kept exactly as typed; only its trimmed form must be
    /// non-empty.
    pub fn validate(&self) -> Result<User, ValidationError> {
        let age = parse_age(&self.age).ok_or(ValidationError::InvalidAge)?;
        if age < ADULT_AGE {
            return Err(ValidationError::InvalidAge);
        }
        if self.country.trim().is_empty() {
            return Err(ValidationError::EmptyCountry);
        }
        Ok(User {
            id: self.id,
            first: self.first.clone(),
            last: self.last.clone(),
            picture: self.picture.clone(),
            dob: self.dob.clone(),
            age,
            gender: self.gender,
            country: self.country.clone(),
            description: self.description.clone(),
        })
    }
}

/// Read typed age text as a whole number of years.
///
/// Any numeric spelling is accepted ("18", "18.0", "1e2") as long as it names
/// a whole, non-negative count that fits the stored `u32`.
fn parse_age(text: &str) -> Option<u32> {
    let n: f64 = text.trim().parse().ok()?;
    if !n.is_finite() || n.fract() != 0.0 || n < 0.0 || n > f64::from(u32::MAX) {
        return None;
    }
    Some(n as u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 17).unwrap()
    }

    fn sample() -> User {
        User {
            id: 7,
            first: "Hana".into(),
            last: "Kobayashi".into(),
            picture: "p.jpg".into(),
            dob: "1988-09-09".into(),
            age: 38,
            gender: Gender::Female,
            country: "Japan".into(),
            description: "Architect".into(),
        }
    }

    #[test]
    fn age_boundary_is_inclusive_at_adult_age() {
        let mut e = EditedUser::from_user(&sample());
        e.set(EditField::Age, "17", today());
        assert_eq!(e.validate(), Err(ValidationError::InvalidAge));
        e.set(EditField::Age, "18", today());
        assert_eq!(e.validate().unwrap().age, 18);
    }

    #[test]
    fn non_numeric_or_empty_age_is_rejected() {
        let mut e = EditedUser::from_user(&sample());
        for bad in ["", "   ", "abc", "-20", "25.5", "NaN", "inf", "1e10"] {
            e.set(EditField::Age, bad, today());
            assert_eq!(e.validate(), Err(ValidationError::InvalidAge), "age {bad:?}");
        }
        e.set(EditField::Age, " 42 ", today());
        assert_eq!(e.validate().unwrap().age, 42);
    }

    #[test]
    fn integral_number_spellings_are_accepted() {
        let mut e = EditedUser::from_user(&sample());
        for (text, years) in [("18.0", 18), ("1e2", 100), ("+30", 30)] {
            e.set(EditField::Age, text, today());
            assert_eq!(e.validate().map(|u| u.age), Ok(years), "age {text:?}");
        }
        e.set(EditField::Age, "17.0", today());
        assert_eq!(e.validate(), Err(ValidationError::InvalidAge));
    }

    #[test]
    fn age_is_checked_before_country() {
        let mut e = EditedUser::from_user(&sample());
        e.set(EditField::Age, "3", today());
        e.set(EditField::Country, "", today());
        assert_eq!(e.validate(), Err(ValidationError::InvalidAge));
        e.set(EditField::Age, "30", today());
        assert_eq!(e.validate(), Err(ValidationError::EmptyCountry));
    }

    #[test]
    fn whitespace_country_rejected_padded_country_kept() {
        let mut e = EditedUser::from_user(&sample());
        e.set(EditField::Country, "   ", today());
        assert_eq!(e.validate(), Err(ValidationError::EmptyCountry));
        e.set(EditField::Country, " X ", today());
        assert_eq!(e.validate().unwrap().country, " X ");
    }

    #[test]
    fn dob_change_recomputes_age() {
        let mut e = EditedUser::from_user(&sample());
        e.set(EditField::Dob, "2000-10-18", today());
        assert_eq!(e.age, "25");
        e.set(EditField::Dob, "2000-10-17", today());
        assert_eq!(e.age, "26");
        e.set(EditField::Dob, "2000-1", today());
        assert_eq!(e.age, "");
        assert_eq!(e.dob, "2000-1");
    }

    #[test]
    fn direct_age_edit_does_not_touch_dob() {
        let mut e = EditedUser::from_user(&sample());
        e.set(EditField::Age, "99", today());
        assert_eq!(e.dob, "1988-09-09");
        assert_eq!(e.validate().unwrap().age, 99);
    }

    #[test]
    fn gender_only_accepts_known_labels() {
        let mut e = EditedUser::from_user(&sample());
        e.set(EditField::Gender, "Rather not say", today());
        assert_eq!(e.gender, Gender::RatherNotSay);
        e.set(EditField::Gender, "Robot", today());
        assert_eq!(e.gender, Gender::RatherNotSay);
    }

    #[test]
    fn focus_order_wraps() {
        assert_eq!(EditField::Description.next(), EditField::Dob);
        assert_eq!(EditField::Dob.prev(), EditField::Description);
    }
}
