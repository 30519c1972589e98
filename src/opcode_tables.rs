use crate::dictionary::WordType;

/// Number of condact codes. The indirection bit leaves 7 bits for the code.
pub const TABLE_SIZE: usize = 128;

/// Condact codes referenced by the decoder
pub const DONE: u8 = 22;
pub const OK: u8 = 23;
pub const SYNONYM: u8 = 36;
pub const NOTDONE: u8 = 103;
pub const REDO: u8 = 108;
pub const SKIP: u8 = 116;
pub const RESTART: u8 = 117;

/// Terminal condacts one compiler emits without the trailing 0xFF
pub const DEFAULT_QUIRK_TERMINATORS: [u8; 6] = [DONE, OK, NOTDONE, SKIP, RESTART, REDO];

/// Mnemonic and parameter count of one condact code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Condact {
    pub name: &'static str,
    pub arity: u8,
}

const fn c(arity: u8, name: &'static str) -> Condact {
    Condact { name, arity }
}

pub const CONDACTS: [Condact; TABLE_SIZE] = [
    c(1, "AT"),      //   0
    c(1, "NOTAT"),   //   1
    c(1, "ATGT"),    //   2
    c(1, "ATLT"),    //   3
    c(1, "PRESENT"), //   4
    c(1, "ABSENT"),  //   5
    c(1, "WORN"),    //   6
    c(1, "NOTWORN"), //   7
    c(1, "CARRIED"), //   8
    c(1, "NOTCARR"), //   9
    c(1, "CHANCE"),  //  10
    c(1, "ZERO"),    //  11
    c(1, "NOTZERO"), //  12
    c(2, "EQ"),      //  13
    c(2, "GT"),      //  14
    c(2, "LT"),      //  15
    c(1, "ADJECT1"), //  16
    c(1, "ADVERB"),  //  17
    c(0, "INVEN"),   //  18
    c(0, "DESC"),    //  19
    c(0, "QUIT"),    //  20
    c(0, "END"),     //  21
    c(0, "DONE"),    //  22
    c(0, "OK"),      //  23
    c(0, "ANYKEY"),  //  24
    c(0, "SAVE"),    //  25
    c(0, "LOAD"),    //  26
    c(1, "DPRINT"),  //  27
    c(1, "DISPLAY"), //  28
    c(0, "CLS"),     //  29
    c(0, "DROPALL"), //  30
    c(0, "AUTOG"),   //  31
    c(0, "AUTOD"),   //  32
    c(0, "AUTOW"),   //  33
    c(0, "AUTOR"),   //  34
    c(1, "PAUSE"),   //  35
    c(2, "SYNONYM"), //  36
    c(1, "GOTO"),    //  37
    c(1, "MESSAGE"), //  38
    c(1, "REMOVE"),  //  39
    c(1, "GET"),     //  40
    c(1, "DROP"),    //  41
    c(1, "WEAR"),    //  42
    c(1, "DESTROY"), //  43
    c(1, "CREATE"),  //  44
    c(2, "SWAP"),    //  45
    c(2, "PLACE"),   //  46
    c(1, "SET"),     //  47
    c(1, "CLEAR"),   //  48
    c(2, "PLUS"),    //  49
    c(2, "MINUS"),   //  50
    c(2, "LET"),     //  51
    c(0, "NEWLINE"), //  52
    c(1, "PRINT"),   //  53
    c(1, "SYSMESS"), //  54
    c(2, "ISAT"),    //  55
    c(1, "SETCO"),   //  56
    c(0, "SPACE"),   //  57
    c(1, "HASAT"),   //  58
    c(1, "HASNAT"),  //  59
    c(0, "LISTOBJ"), //  60
    c(1, "EXTERN"),  //  61
    c(0, "RAMSAVE"), //  62
    c(1, "RAMLOAD"), //  63
    c(2, "BEEP"),    //  64
    c(1, "PAPER"),   //  65
    c(1, "INK"),     //  66
    c(1, "BORDER"),  //  67
    c(1, "PREP"),    //  68
    c(1, "NOUN2"),   //  69
    c(1, "ADJECT2"), //  70
    c(2, "ADD"),     //  71
    c(2, "SUB"),     //  72
    c(0, "PARSE"),   //  73
    c(1, "LISTAT"),  //  74
    c(1, "PROCESS"), //  75
    c(2, "SAME"),    //  76
    c(1, "MES"),     //  77
    c(1, "WINDOW"),  //  78
    c(2, "NOTEQ"),   //  79
    c(2, "NOTSAME"), //  80
    c(1, "MODE"),    //  81
    c(2, "WINAT"),   //  82
    c(2, "TIME"),    //  83
    c(1, "PICTURE"), //  84
    c(1, "DOALL"),   //  85
    c(1, "MOUSE"),   //  86
    c(2, "GFX"),     //  87
    c(2, "ISNOTAT"), //  88
    c(2, "WEIGH"),   //  89
    c(2, "PUTIN"),   //  90
    c(2, "TAKEOUT"), //  91
    c(0, "NEWTEXT"), //  92
    c(2, "ABILITY"), //  93
    c(1, "WEIGHT"),  //  94
    c(1, "RANDOM"),  //  95
    c(2, "INPUT"),   //  96
    c(0, "SAVEAT"),  //  97
    c(0, "BACKAT"),  //  98
    c(2, "PRINTAT"), //  99
    c(0, "WHATO"),   // 100
    c(1, "CALL"),    // 101
    c(1, "PUTO"),    // 102
    c(0, "NOTDONE"), // 103
    c(1, "AUTOP"),   // 104
    c(1, "AUTOT"),   // 105
    c(1, "MOVE"),    // 106
    c(2, "WINSIZE"), // 107
    c(0, "REDO"),    // 108
    c(0, "CENTRE"),  // 109
    c(1, "EXIT"),    // 110
    c(0, "INKEY"),   // 111
    c(2, "BIGGER"),  // 112
    c(2, "SMALLER"), // 113
    c(0, "ISDONE"),  // 114
    c(0, "ISNDONE"), // 115
    c(1, "SKIP"),    // 116
    c(0, "RESTART"), // 117
    c(1, "TAB"),     // 118
    c(2, "COPYOF"),  // 119
    c(0, "dumb"),    // 120 internal
    c(2, "COPYOO"),  // 121
    c(0, "dumb"),    // 122 internal
    c(2, "COPYFO"),  // 123
    c(0, "dumb"),    // 124 internal
    c(2, "COPYFF"),  // 125
    c(2, "COPYBF"),  // 126
    c(0, "RESET"),   // 127
];

lazy_static! {
    /// Games without extended attributes use 56..59 for the COPY family
    static ref LEGACY_CONDACTS: [Condact; TABLE_SIZE] = {
        let mut t = CONDACTS;
        t[56] = c(2, "COPYOF");
        t[57] = c(2, "COPYOO");
        t[58] = c(2, "COPYFO");
        t[59] = c(2, "COPYFF");
        t
    };
}

/// The condact table variant in force for one game
#[derive(Debug, Clone, Copy)]
pub struct CondactTable {
    entries: &'static [Condact; TABLE_SIZE],
    legacy: bool,
}

impl CondactTable {
    pub fn for_format(is_old_format: bool) -> CondactTable {
        if is_old_format {
            CondactTable {
                entries: &LEGACY_CONDACTS,
                legacy: true,
            }
        } else {
            CondactTable {
                entries: &CONDACTS,
                legacy: false,
            }
        }
    }

    pub fn is_legacy(&self) -> bool {
        self.legacy
    }

    pub fn get(&self, opcode: u8) -> Option<Condact> {
        self.entries.get(opcode as usize).copied()
    }
}

/// Vocabulary type of a condact parameter that names a word, if any
pub fn param_word_type(opcode: u8, index: usize) -> Option<WordType> {
    match (opcode, index) {
        (SYNONYM, 0) => Some(WordType::Verb),
        (SYNONYM, 1) => Some(WordType::Noun),
        (16, 0) | (70, 0) => Some(WordType::Adjective),
        (17, 0) => Some(WordType::Adverb),
        (68, 0) => Some(WordType::Preposition),
        (69, 0) => Some(WordType::Noun),
        _ => None,
    }
}
