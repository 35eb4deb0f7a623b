// SPDX-FileCopyrightText: 2026 Sudsbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Built-in default template texts.
//!
//! These are the fallback replies used when a store has no override row for
//! a key. Texts are Thai, matching the bot's primary audience.

use sudsbot_core::TemplateKey;

/// Default text for a template key.
pub fn default_text(key: TemplateKey) -> &'static str {
    match key {
        TemplateKey::Greeting => "สวัสดีค่ะ 👋 ต้องการใช้บริการอะไรคะ เลือกได้เลยค่ะ",
        TemplateKey::Confirmation => {
            "รับทราบค่ะ! ✅\nเริ่มจับเวลา {duration} นาทีสำหรับ {display_name} แล้วค่ะ"
        }
        TemplateKey::Busy => "ขออภัยค่ะ 🙏\nเครื่อง {display_name} กำลังใช้งานอยู่ค่ะ",
        TemplateKey::Inactive => "ขออภัยค่ะ เครื่อง {display_name} ปิดให้บริการชั่วคราวค่ะ",
        TemplateKey::NotFound => "ขออภัยค่ะ ไม่พบเครื่องที่เลือกค่ะ",
        TemplateKey::NonText => "ขออภัยค่ะ บอทเข้าใจเฉพาะข้อความตัวอักษรเท่านั้น",
        TemplateKey::GenericError => "ขออภัยค่ะ เกิดข้อผิดพลาดทางเทคนิค กรุณาลองใหม่อีกครั้ง",
        TemplateKey::ChooseWasher => "เลือกเครื่องซักผ้าได้เลยค่ะ 🧺",
        TemplateKey::ChooseDryer => "เลือกเครื่องอบผ้าได้เลยค่ะ 🔥",
        TemplateKey::NoMachines => "ขออภัยค่ะ ยังไม่มีเครื่องเปิดให้บริการค่ะ",
    }
}
