/*!
 * Script-level text helpers.
 *
 * Translate/skip decisions, CJK detection, text direction detection and the
 * simplified-to-traditional normalization applied to Traditional Chinese
 * output.
 */

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

/// Text direction of a rendered line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextDirection {
    /// Left-to-right
    Ltr,
    /// Right-to-left (Arabic, Hebrew)
    Rtl,
}

static NUMBER_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[-+]?\d+([.,]\d+)*[.]?$").expect("number pattern is valid"));

/// Collapse whitespace runs and lowercase, for fuzzy comparisons.
pub fn normalize_text(text: &str) -> String {
    let collapsed: Vec<&str> = text.split_whitespace().collect();
    collapsed.join(" ").to_lowercase()
}

/// Check if text contains CJK ideographs.
pub fn has_cjk(text: &str) -> bool {
    text.chars().any(|ch| ('\u{4e00}'..='\u{9fff}').contains(&ch))
}

/// Decide whether a text fragment is worth sending to the model.
///
/// Skips blanks, pure digits, numbers with punctuation ("5.", "1.4", "-10",
/// "3,900"), pure punctuation, and fragments with fewer than three letters.
/// Everything else translates regardless of the source language setting: if
/// the user picked a source language they want that text translated.
pub fn should_translate(text: &str) -> bool {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return false;
    }

    let alphanumeric: String = trimmed.chars().filter(|ch| ch.is_alphanumeric()).collect();
    if alphanumeric.is_empty() {
        return false;
    }

    if alphanumeric.chars().all(|ch| ch.is_ascii_digit()) {
        return false;
    }

    if NUMBER_PATTERN.is_match(trimmed) {
        return false;
    }

    let letter_count = trimmed.chars().filter(|ch| ch.is_alphabetic()).count();
    letter_count >= 3
}

/// Detect the dominant direction of a text fragment.
///
/// Scans for RTL Unicode ranges (Hebrew, Arabic and the Arabic supplement /
/// presentation forms); more than half the alphabetic characters being RTL
/// flips the result.
pub fn detect_text_direction(text: &str) -> TextDirection {
    const RTL_RANGES: [(u32, u32); 5] = [
        (0x0590, 0x05FF), // Hebrew
        (0x0600, 0x06FF), // Arabic
        (0x0750, 0x077F), // Arabic Supplement
        (0xFB50, 0xFDFF), // Arabic Presentation Forms-A
        (0xFE70, 0xFEFF), // Arabic Presentation Forms-B
    ];

    let mut rtl_count = 0usize;
    let mut total_count = 0usize;

    for ch in text.chars().filter(|ch| ch.is_alphabetic()) {
        total_count += 1;
        let code = ch as u32;
        if RTL_RANGES
            .iter()
            .any(|(start, end)| (*start..=*end).contains(&code))
        {
            rtl_count += 1;
        }
    }

    if total_count > 0 && rtl_count * 2 > total_count {
        TextDirection::Rtl
    } else {
        TextDirection::Ltr
    }
}

/// Frequent simplified -> traditional character pairs.
///
/// The model sometimes emits simplified characters for Traditional Chinese
/// targets even when prompted otherwise; this table covers the characters
/// that show up in practice. Characters outside the table pass through
/// unchanged.
const S2T_PAIRS: &[(char, char)] = &[
    ('爱', '愛'), ('边', '邊'), ('变', '變'), ('标', '標'), ('别', '別'),
    ('宾', '賓'), ('补', '補'), ('产', '產'), ('长', '長'), ('厂', '廠'),
    ('车', '車'), ('彻', '徹'), ('称', '稱'), ('处', '處'), ('传', '傳'),
    ('创', '創'), ('词', '詞'), ('从', '從'), ('达', '達'), ('带', '帶'),
    ('单', '單'), ('当', '當'), ('党', '黨'), ('导', '導'), ('点', '點'),
    ('电', '電'), ('东', '東'), ('动', '動'), ('断', '斷'), ('对', '對'),
    ('队', '隊'), ('发', '發'), ('费', '費'), ('风', '風'), ('丰', '豐'),
    ('刚', '剛'), ('个', '個'), ('给', '給'), ('观', '觀'), ('广', '廣'),
    ('规', '規'), ('国', '國'), ('过', '過'), ('汉', '漢'), ('号', '號'),
    ('华', '華'), ('话', '話'), ('还', '還'), ('会', '會'), ('机', '機'),
    ('积', '積'), ('极', '極'), ('记', '記'), ('际', '際'), ('继', '繼'),
    ('间', '間'), ('见', '見'), ('将', '將'), ('讲', '講'), ('节', '節'),
    ('结', '結'), ('进', '進'), ('经', '經'), ('据', '據'), ('开', '開'),
    ('来', '來'), ('劳', '勞'), ('乐', '樂'), ('离', '離'), ('丽', '麗'),
    ('历', '歷'), ('连', '連'), ('联', '聯'), ('两', '兩'), ('临', '臨'),
    ('龙', '龍'), ('楼', '樓'), ('论', '論'), ('马', '馬'), ('买', '買'),
    ('卖', '賣'), ('门', '門'), ('们', '們'), ('梦', '夢'), ('难', '難'),
    ('内', '內'), ('鸟', '鳥'), ('农', '農'), ('欧', '歐'), ('盘', '盤'),
    ('气', '氣'), ('钱', '錢'), ('亲', '親'), ('轻', '輕'), ('请', '請'),
    ('区', '區'), ('权', '權'), ('确', '確'), ('让', '讓'), ('热', '熱'),
    ('认', '認'), ('软', '軟'), ('伤', '傷'), ('设', '設'), ('胜', '勝'),
    ('师', '師'), ('时', '時'), ('实', '實'), ('识', '識'), ('书', '書'),
    ('术', '術'), ('数', '數'), ('双', '雙'), ('说', '說'), ('丝', '絲'),
    ('虽', '雖'), ('岁', '歲'), ('态', '態'), ('体', '體'), ('条', '條'),
    ('铁', '鐵'), ('听', '聽'), ('头', '頭'), ('图', '圖'), ('团', '團'),
    ('万', '萬'), ('为', '為'), ('伟', '偉'), ('卫', '衛'), ('温', '溫'),
    ('问', '問'), ('无', '無'), ('务', '務'), ('习', '習'), ('戏', '戲'),
    ('显', '顯'), ('现', '現'), ('线', '線'), ('乡', '鄉'), ('响', '響'),
    ('写', '寫'), ('学', '學'), ('亚', '亞'), ('严', '嚴'), ('阳', '陽'),
    ('样', '樣'), ('业', '業'), ('叶', '葉'), ('义', '義'), ('艺', '藝'),
    ('亿', '億'), ('译', '譯'), ('阴', '陰'), ('应', '應'), ('优', '優'),
    ('邮', '郵'), ('于', '於'), ('与', '與'), ('语', '語'), ('员', '員'),
    ('园', '園'), ('远', '遠'), ('愿', '願'), ('约', '約'), ('云', '雲'),
    ('运', '運'), ('杂', '雜'), ('则', '則'), ('张', '張'), ('这', '這'),
    ('证', '證'), ('职', '職'), ('执', '執'), ('质', '質'), ('钟', '鐘'),
    ('种', '種'), ('众', '眾'), ('专', '專'), ('转', '轉'), ('庄', '莊'),
    ('准', '準'), ('资', '資'), ('总', '總'), ('组', '組'),
];

static S2T_MAP: Lazy<HashMap<char, char>> =
    Lazy::new(|| S2T_PAIRS.iter().copied().collect());

/// Map simplified Chinese characters to their traditional forms.
pub fn to_traditional(text: &str) -> String {
    text.chars()
        .map(|ch| S2T_MAP.get(&ch).copied().unwrap_or(ch))
        .collect()
}
