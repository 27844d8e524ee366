//! Reference question catalog and its idempotent loader.
//!
//! The catalog is the engine's immutable reference data: 20 questions
//! (5 single-choice, 4 multiple-choice, 4 short-answer, 3 phone-number,
//! 4 long-answer) with 40 options across the choice questions. Re-running
//! the loader upserts in place and leaves exactly one catalog.

use quiz_core::model::{OptionId, Question, QuestionError, QuestionId, QuestionOption, QuestionType};

use super::mapping::{map_sqlx_error, option_id_to_i64, question_id_to_i64, ser};
use super::SqliteRepository;
use crate::repository::StorageError;

fn question(
    id: u64,
    order_no: u32,
    text: &str,
    question_type: QuestionType,
    correct_answer: Option<&str>,
    options: &[(u64, &str)],
) -> Result<Question, QuestionError> {
    let question_id = QuestionId::new(id);
    let options = options
        .iter()
        .map(|(option_id, text)| QuestionOption {
            id: OptionId::new(*option_id),
            question_id,
            text: (*text).to_string(),
        })
        .collect();
    Question::new(
        question_id,
        order_no,
        text,
        question_type,
        correct_answer.map(ToString::to_string),
        options,
    )
}

/// Builds the reference catalog in canonical `order_no` order.
///
/// # Errors
///
/// Returns `QuestionError` if any entry violates the domain invariants
/// (which would be a programming error in the table below).
pub fn reference_catalog() -> Result<Vec<Question>, QuestionError> {
    use QuestionType::{LongAnswer, MultipleChoice, PhoneNumber, ShortAnswer, SingleChoice};

    Ok(vec![
        question(
            1,
            1,
            "What is the capital of France?",
            SingleChoice,
            Some("1"),
            &[(1, "Paris"), (2, "London"), (3, "Berlin"), (4, "Madrid")],
        )?,
        question(
            2,
            2,
            "Which of the following are programming languages?",
            MultipleChoice,
            Some("5,6,7"),
            &[(5, "C#"), (6, "Python"), (7, "JavaScript"), (8, "Photoshop")],
        )?,
        question(3, 3, "What does HTML stand for?", ShortAnswer, None, &[])?,
        question(4, 4, "Enter your phone number", PhoneNumber, None, &[])?,
        question(
            5,
            5,
            "Explain the concept of Object-Oriented Programming in detail.",
            LongAnswer,
            None,
            &[],
        )?,
        question(
            6,
            6,
            "Which planet is known as the Red Planet?",
            SingleChoice,
            Some("11"),
            &[(9, "Venus"), (10, "Jupiter"), (11, "Mars"), (12, "Saturn")],
        )?,
        question(
            7,
            7,
            "Select all prime numbers from the list below.",
            MultipleChoice,
            Some("14,15,17"),
            &[(13, "4"), (14, "7"), (15, "11"), (16, "9"), (17, "13")],
        )?,
        question(
            8,
            8,
            "What is the chemical symbol for water?",
            ShortAnswer,
            None,
            &[],
        )?,
        question(
            9,
            9,
            "What is the largest ocean on Earth?",
            SingleChoice,
            Some("21"),
            &[
                (18, "Atlantic Ocean"),
                (19, "Indian Ocean"),
                (20, "Arctic Ocean"),
                (21, "Pacific Ocean"),
            ],
        )?,
        question(
            10,
            10,
            "Which of these are JavaScript frameworks?",
            MultipleChoice,
            Some("25,26,27"),
            &[
                (22, "Django"),
                (23, "Laravel"),
                (24, "Flask"),
                (25, "React"),
                (26, "Angular"),
                (27, "Vue.js"),
            ],
        )?,
        question(
            11,
            11,
            "What is the square root of 144?",
            ShortAnswer,
            None,
            &[],
        )?,
        question(
            12,
            12,
            "Enter your emergency contact number",
            PhoneNumber,
            None,
            &[],
        )?,
        question(
            13,
            13,
            "Who painted the Mona Lisa?",
            SingleChoice,
            Some("31"),
            &[
                (28, "Vincent van Gogh"),
                (29, "Pablo Picasso"),
                (30, "Michelangelo"),
                (31, "Leonardo da Vinci"),
            ],
        )?,
        question(
            14,
            14,
            "Which of these are database systems?",
            MultipleChoice,
            Some("33,34,35"),
            &[
                (32, "Photoshop"),
                (33, "MySQL"),
                (34, "PostgreSQL"),
                (35, "MongoDB"),
                (36, "Excel"),
            ],
        )?,
        question(15, 15, "What does CSS stand for?", ShortAnswer, None, &[])?,
        question(
            16,
            16,
            "Describe the difference between SQL and NoSQL databases.",
            LongAnswer,
            None,
            &[],
        )?,
        question(
            17,
            17,
            "What is the speed of light approximately?",
            SingleChoice,
            Some("39"),
            &[
                (37, "150,000 km/s"),
                (38, "500,000 km/s"),
                (39, "300,000 km/s"),
                (40, "1,000,000 km/s"),
            ],
        )?,
        question(
            18,
            18,
            "Enter your alternate mobile number",
            PhoneNumber,
            None,
            &[],
        )?,
        question(
            19,
            19,
            "What are the advantages of using cloud computing?",
            LongAnswer,
            None,
            &[],
        )?,
        question(
            20,
            20,
            "Explain the MVC architecture pattern and its benefits.",
            LongAnswer,
            None,
            &[],
        )?,
    ])
}

/// Upserts the reference catalog into the connected database and returns
/// the number of questions seeded.
///
/// # Errors
///
/// Returns `StorageError` on query failures.
pub async fn seed_reference_catalog(repo: &SqliteRepository) -> Result<usize, StorageError> {
    let catalog = reference_catalog().map_err(ser)?;

    for q in &catalog {
        upsert_question(repo, q).await?;
    }

    Ok(catalog.len())
}

async fn upsert_question(repo: &SqliteRepository, q: &Question) -> Result<(), StorageError> {
    sqlx::query(
        r"
        INSERT INTO questions (id, order_no, text, question_type, correct_answer)
        VALUES (?1, ?2, ?3, ?4, ?5)
        ON CONFLICT(id) DO UPDATE SET
            order_no = excluded.order_no,
            text = excluded.text,
            question_type = excluded.question_type,
            correct_answer = excluded.correct_answer
        ",
    )
    .bind(question_id_to_i64(q.id)?)
    .bind(i64::from(q.order_no))
    .bind(q.text.as_str())
    .bind(q.question_type.as_str())
    .bind(q.correct_answer.as_deref())
    .execute(repo.pool())
    .await
    .map_err(map_sqlx_error)?;

    for option in &q.options {
        sqlx::query(
            r"
            INSERT INTO question_options (id, question_id, text)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(id) DO UPDATE SET
                question_id = excluded.question_id,
                text = excluded.text
            ",
        )
        .bind(option_id_to_i64(option.id)?)
        .bind(question_id_to_i64(option.question_id)?)
        .bind(option.text.as_str())
        .execute(repo.pool())
        .await
        .map_err(map_sqlx_error)?;
    }

    Ok(())
}
