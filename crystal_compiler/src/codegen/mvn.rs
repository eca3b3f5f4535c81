//! Assembly text for the MVN stack machine.
//!
//! Frames are addressed relative to the base pointer `svbptr`, and the
//! runtime library imported in the header does the memory access,
//! activation record management and I/O.
use super::{CodeGen, Label, StrId};
use crate::{
    expr::{Arith, Logic, Operand, OperandKind, Relation, Unary},
    symbol::Type,
};
use log::debug;
use smol_str::SmolStr;
use std::{
    collections::BTreeMap,
    fmt::{self, Write},
};

/// Offset of the return value in an activation record.
const RETURN_SLOT: usize = 2;

/// Largest value that fits the operand of `LV`.
const MAX_IMMEDIATE: u16 = 0x0FFF;

const EXPORTS: &[&str] = &["main", "stacks", "stacke", "strbct", "strbs"];

#[rustfmt::skip]
const IMPORTS: &[&str] = &[
    "evaddr", "evval", "evoffs", "evsign", "evtemp",
    "ercad", "erwrt", "errd", "ercpb",
    "svbptr", "svsptr", "svsize",
    "srpsa", "srppa", "srptv", "srwfra", "srrfra",
    "scani", "scans", "puti", "puts", "putb", "pbrkl",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Jp,
    Jz,
    Jn,
    Lv,
    Add,
    Sub,
    Mul,
    Div,
    Ld,
    Mm,
    Sc,
    Rs,
    Hm,
    Os,
    K,
    Origin,
    End,
    Export,
    Import,
}

impl fmt::Display for Op {
    #[rustfmt::skip]
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mnemonic = match self {
            Op::Jp      => "JP",
            Op::Jz      => "JZ",
            Op::Jn      => "JN",
            Op::Lv      => "LV",
            Op::Add     => "+",
            Op::Sub     => "-",
            Op::Mul     => "*",
            Op::Div     => "/",
            Op::Ld      => "LD",
            Op::Mm      => "MM",
            Op::Sc      => "SC",
            Op::Rs      => "RS",
            Op::Hm      => "HM",
            Op::Os      => "OS",
            Op::K       => "K",
            Op::Origin  => "&",
            Op::End     => "#",
            Op::Export  => ">",
            Op::Import  => "<",
        };
        write!(f, "{}", mnemonic)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Arg {
    None,
    Name(SmolStr),
    Word(u16),
}

impl fmt::Display for Arg {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Arg::None => Ok(()),
            Arg::Name(name) => write!(f, "{}", name),
            Arg::Word(word) => write!(f, "/{:04x}", word),
        }
    }
}

/// Line of assembly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Instr {
    Blank,
    Comment(String),
    Line {
        label: Option<SmolStr>,
        op: Op,
        arg: Arg,
    },
}

/// Outputs the line with label, mnemonic and argument in columns.
impl fmt::Display for Instr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Instr::Blank => Ok(()),
            Instr::Comment(text) => write!(f, "; {}", text),
            Instr::Line { label, op, arg } => {
                let label = label.as_deref().unwrap_or("");
                let line = format!("{:<8}{:<4}{}", label, op.to_string(), arg);
                write!(f, "{}", line.trim_end())
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Routine {
    Main,
    Function(usize),
}

impl Routine {
    fn return_label(self) -> SmolStr {
        match self {
            Routine::Main => SmolStr::new_inline("mend"),
            Routine::Function(index) => SmolStr::from(format!("r{:02x}", index)),
        }
    }
}

#[inline]
fn function_label(index: usize) -> SmolStr {
    SmolStr::from(format!("f{:02x}", index))
}

#[inline]
fn frame_size_label(index: usize) -> SmolStr {
    SmolStr::from(format!("z{:02x}", index))
}

/// Options for the rendered program.
#[derive(Debug, Clone)]
pub struct MvnConf {
    /// Comment block at the top of the output.
    pub header: Option<String>,
    /// Extra words between the main frame and the start of the call stack.
    pub stack_reserve: usize,
}

impl Default for MvnConf {
    fn default() -> Self {
        Self {
            header: None,
            stack_reserve: 0,
        }
    }
}

/// MVN assembly generator.
pub struct Mvn {
    conf: MvnConf,
    code: Vec<Instr>,
    /// Label waiting for the next emitted line.
    pending: Option<SmolStr>,
    /// Words that do not fit an immediate, by value.
    constants: BTreeMap<u16, SmolStr>,
    /// String buffer, two characters per word.
    strings: Vec<u16>,
    /// Counter for compiler internal labels.
    internal: usize,
    routine: Option<Routine>,
    /// Words used by the current routine's frame.
    frame: usize,
    main_frame: usize,
}

impl Mvn {
    #[inline]
    pub fn new() -> Self {
        Self::with_conf(MvnConf::default())
    }

    pub fn with_conf(conf: MvnConf) -> Self {
        Self {
            conf,
            code: vec![],
            pending: None,
            constants: BTreeMap::new(),
            strings: vec![],
            internal: 0,
            routine: None,
            frame: 0,
            main_frame: 0,
        }
    }

    /// Emitted code lines, without header and data sections.
    #[inline]
    pub fn code(&self) -> &[Instr] {
        &self.code
    }

    /// Renders the complete program.
    pub fn finish(&self) -> Result<String, fmt::Error> {
        let mut out = String::new();

        if let Some(header) = &self.conf.header {
            writeln!(out, ";")?;
            for line in header.lines() {
                writeln!(out, ";  {}", line)?;
            }
            writeln!(out, ";")?;
            writeln!(out)?;
        }

        for name in EXPORTS {
            writeln!(out, "{}", Self::line(Some(*name), Op::Export, Arg::None))?;
        }
        for name in IMPORTS {
            writeln!(out, "{}", Self::line(Some(*name), Op::Import, Arg::None))?;
        }
        writeln!(out)?;
        writeln!(out, "{}", Self::line(None, Op::Origin, Arg::Word(0)))?;

        for instr in &self.code {
            writeln!(out, "{}", instr)?;
        }
        if let Some(label) = &self.pending {
            writeln!(out, "{}", Self::line(Some(label.as_str()), Op::Os, Arg::Word(0)))?;
        }

        writeln!(out)?;
        writeln!(out, "; Constants")?;
        for (value, label) in &self.constants {
            writeln!(out, "{}", Self::line(Some(label.as_str()), Op::K, Arg::Word(*value)))?;
        }

        writeln!(out)?;
        writeln!(out, "; String buffer")?;
        writeln!(
            out,
            "{}",
            Self::line(Some("strbct"), Op::K, Arg::Word(self.strings.len() as u16 * 2))
        )?;
        if self.strings.is_empty() {
            writeln!(out, "{}", Self::line(Some("strbs"), Op::K, Arg::Word(0)))?;
        }
        for (i, word) in self.strings.iter().enumerate() {
            let label = if i == 0 { Some("strbs") } else { None };
            writeln!(out, "{}", Self::line(label, Op::K, Arg::Word(*word)))?;
        }

        writeln!(out)?;
        writeln!(out, "; Stack")?;
        let words = (self.main_frame + self.conf.stack_reserve).max(1);
        writeln!(out, "{}", Self::line(Some("stacks"), Op::K, Arg::Word(0)))?;
        for _ in 1..words {
            writeln!(out, "{}", Self::line(None, Op::K, Arg::Word(0)))?;
        }
        writeln!(out, "{}", Self::line(Some("stacke"), Op::K, Arg::Word(0)))?;
        writeln!(out)?;
        writeln!(out, "{}", Self::line(None, Op::End, Arg::Name("main".into())))?;

        Ok(out)
    }

    fn line(label: Option<&str>, op: Op, arg: Arg) -> Instr {
        Instr::Line {
            label: label.map(SmolStr::from),
            op,
            arg,
        }
    }

    fn emit(&mut self, op: Op, arg: Arg) {
        self.code.push(Instr::Line {
            label: self.pending.take(),
            op,
            arg,
        });
    }

    #[inline]
    fn emit_name(&mut self, op: Op, name: &str) {
        self.emit(op, Arg::Name(SmolStr::from(name)));
    }

    /// Attach a label to the next emitted line.
    fn place(&mut self, label: SmolStr) {
        if self.pending.is_some() {
            self.emit(Op::Os, Arg::Word(0));
        }
        self.pending = Some(label);
    }

    fn comment(&mut self, text: impl ToString) {
        if let Some(label) = self.pending.take() {
            self.code.push(Self::line(Some(label.as_str()), Op::Os, Arg::Word(0)));
        }
        self.code.push(Instr::Blank);
        self.code.push(Instr::Comment(text.to_string()));
    }

    fn internal_label(&mut self) -> SmolStr {
        let label = SmolStr::from(format!("c{:04}", self.internal));
        self.internal += 1;
        label
    }

    /// Load a constant word into the accumulator.
    fn constant(&mut self, value: i64) {
        let word = value as u16;
        if word <= MAX_IMMEDIATE {
            self.emit(Op::Lv, Arg::Word(word));
        } else {
            let next = self.constants.len();
            let label = self
                .constants
                .entry(word)
                .or_insert_with(|| SmolStr::from(format!("k{:04}", next)))
                .clone();
            self.emit(Op::Ld, Arg::Name(label));
        }
    }

    fn literal(operand: &Operand) -> i64 {
        match operand.kind {
            OperandKind::Int(value) => value,
            OperandKind::Char(c) => c as i64,
            OperandKind::Bool(b) => b as i64,
            OperandKind::Str(id) => id.0 as i64,
            OperandKind::LineBreak => 0,
            OperandKind::Variable(offset) | OperandKind::Temporary(offset) => offset as i64,
        }
    }

    fn frame_access(&mut self, offset: usize, routine: &str) {
        self.emit_name(Op::Ld, "svbptr");
        self.emit_name(Op::Mm, "evaddr");
        self.constant(offset as i64);
        self.emit_name(Op::Mm, "evoffs");
        self.emit_name(Op::Sc, routine);
    }

    /// Frame word at `offset` into `evval`.
    #[inline]
    fn read(&mut self, offset: usize) {
        self.frame_access(offset, "errd");
    }

    /// `evval` into the frame word at `offset`.
    #[inline]
    fn write(&mut self, offset: usize) {
        self.frame_access(offset, "erwrt");
    }

    /// Operand value into `evval`.
    fn load(&mut self, operand: &Operand) {
        match operand.offset() {
            Some(offset) => self.read(offset),
            None => {
                self.constant(Self::literal(operand));
                self.emit_name(Op::Mm, "evval");
            }
        }
    }

    /// Operand value into the accumulator.
    fn load_acc(&mut self, operand: &Operand) {
        match operand.offset() {
            Some(offset) => {
                self.read(offset);
                self.emit_name(Op::Ld, "evval");
            }
            None => self.constant(Self::literal(operand)),
        }
    }

    /// Accumulator becomes `0` or `1`.
    fn normalize(&mut self) {
        let label = self.internal_label();
        self.emit(Op::Jz, Arg::Name(label.clone()));
        self.emit(Op::Lv, Arg::Word(1));
        self.place(label);
    }

    /// Left operand in `evtemp`, right operand in `evval`, and the left
    /// operand in the accumulator.
    fn binary_operands(&mut self, left: &Operand, right: &Operand) {
        self.load_acc(left);
        self.emit_name(Op::Mm, "evtemp");
        self.load(right);
        self.emit_name(Op::Ld, "evtemp");
    }

    /// Copy `size` words between absolute addresses computed from the
    /// given bases and offsets.
    fn block_copy(&mut self, from: (&str, usize), to: (&str, usize), size: usize) {
        self.constant(from.1 as i64);
        self.emit_name(Op::Add, from.0);
        self.emit_name(Op::Mm, "evaddr");
        self.constant(to.1 as i64);
        self.emit_name(Op::Add, to.0);
        self.emit_name(Op::Mm, "evval");
        self.constant(size as i64);
        self.emit_name(Op::Mm, "evoffs");
        self.emit_name(Op::Sc, "ercpb");
    }

    fn routine_return_label(&self) -> SmolStr {
        self.routine.unwrap_or(Routine::Main).return_label()
    }
}

impl Default for Mvn {
    fn default() -> Self {
        Self::new()
    }
}

impl CodeGen for Mvn {
    fn begin_function(&mut self, index: usize, name: &str, frame: usize) {
        debug!("function {} as {}", name, function_label(index));
        let label = function_label(index);
        self.routine = Some(Routine::Function(index));
        self.frame = frame;

        self.comment(format!("Function: {}", name));
        self.place(label.clone());
        self.emit(Op::K, Arg::Word(0));

        // Push the activation record and save the return address.
        self.emit(Op::Ld, Arg::Name(frame_size_label(index)));
        self.emit_name(Op::Mm, "svsize");
        self.emit_name(Op::Sc, "srpsa");
        self.emit(Op::Ld, Arg::Name(label));
        self.emit_name(Op::Mm, "evval");
        self.emit_name(Op::Sc, "srwfra");
    }

    fn end_function(&mut self, index: usize) {
        let label = function_label(index);
        self.place(Routine::Function(index).return_label());
        self.emit_name(Op::Sc, "srrfra");
        self.emit(Op::Mm, Arg::Name(label.clone()));
        self.emit_name(Op::Sc, "srppa");
        self.emit(Op::Rs, Arg::Name(label));

        self.place(frame_size_label(index));
        self.emit(Op::K, Arg::Word(self.frame as u16));
        self.routine = None;
    }

    fn begin_main(&mut self, frame: usize) {
        self.routine = Some(Routine::Main);
        self.frame = frame;

        self.comment("Main");
        self.place(SmolStr::new_inline("main"));
        self.emit_name(Op::Lv, "stacks");
        self.emit_name(Op::Mm, "svbptr");
        self.emit_name(Op::Lv, "stacke");
        self.emit_name(Op::Mm, "svsptr");
    }

    fn end_main(&mut self) {
        self.place(Routine::Main.return_label());
        self.emit_name(Op::Hm, "main");
        self.main_frame = self.frame;
        self.routine = None;
    }

    fn temporary(&mut self, offset: usize) {
        self.frame = self.frame.max(offset + 1);
    }

    fn assign(&mut self, target: usize, value: &Operand, size: usize) {
        match (size, value.offset()) {
            (0, _) => {}
            (1, _) | (_, None) => {
                self.load(value);
                self.write(target);
            }
            (_, Some(source)) => self.block_copy(("svbptr", source), ("svbptr", target), size),
        }
    }

    fn arithmetic(&mut self, op: Arith, left: &Operand, right: &Operand, dest: usize) {
        self.binary_operands(left, right);
        match op {
            Arith::Add => self.emit_name(Op::Add, "evval"),
            Arith::Sub => self.emit_name(Op::Sub, "evval"),
            Arith::Mul => self.emit_name(Op::Mul, "evval"),
            Arith::Div => self.emit_name(Op::Div, "evval"),
            Arith::Mod => {
                // a % b = a - (a / b) * b
                self.emit_name(Op::Div, "evval");
                self.emit_name(Op::Mul, "evval");
                self.emit_name(Op::Mm, "evsign");
                self.emit_name(Op::Ld, "evtemp");
                self.emit_name(Op::Sub, "evsign");
            }
        }
        self.emit_name(Op::Mm, "evval");
        self.write(dest);
    }

    fn compare(&mut self, op: Relation, left: &Operand, right: &Operand, dest: usize) {
        // (operands swapped, jump on, value when the jump is taken)
        #[rustfmt::skip]
        let (swap, jump, taken) = match op {
            Relation::Less      => (false, Op::Jn, 1),
            Relation::Greater   => (true,  Op::Jn, 1),
            Relation::LessEq    => (true,  Op::Jn, 0),
            Relation::GreaterEq => (false, Op::Jn, 0),
            Relation::Equal     => (false, Op::Jz, 1),
            Relation::NotEqual  => (false, Op::Jz, 0),
        };

        if swap {
            self.binary_operands(right, left);
        } else {
            self.binary_operands(left, right);
        }
        self.emit_name(Op::Sub, "evval");

        let taken_label = self.internal_label();
        let end_label = self.internal_label();
        self.emit(jump, Arg::Name(taken_label.clone()));
        self.emit(Op::Lv, Arg::Word(1 - taken));
        self.emit(Op::Jp, Arg::Name(end_label.clone()));
        self.place(taken_label);
        self.emit(Op::Lv, Arg::Word(taken));
        self.place(end_label);
        self.emit_name(Op::Mm, "evval");
        self.write(dest);
    }

    fn logical(&mut self, op: Logic, left: &Operand, right: &Operand, dest: usize) {
        self.load_acc(left);
        self.normalize();
        self.emit_name(Op::Mm, "evtemp");
        self.load_acc(right);
        self.normalize();
        self.emit_name(Op::Mm, "evval");
        self.emit_name(Op::Ld, "evtemp");
        match op {
            Logic::And => self.emit_name(Op::Mul, "evval"),
            Logic::Or => {
                self.emit_name(Op::Add, "evval");
                self.normalize();
            }
        }
        self.emit_name(Op::Mm, "evval");
        self.write(dest);
    }

    fn unary(&mut self, op: Unary, operand: &Operand, dest: usize) {
        match op {
            Unary::Minus => {
                self.load(operand);
                self.emit(Op::Lv, Arg::Word(0));
                self.emit_name(Op::Sub, "evval");
            }
            Unary::Not => {
                self.load_acc(operand);
                let zero = self.internal_label();
                let end = self.internal_label();
                self.emit(Op::Jz, Arg::Name(zero.clone()));
                self.emit(Op::Lv, Arg::Word(0));
                self.emit(Op::Jp, Arg::Name(end.clone()));
                self.place(zero);
                self.emit(Op::Lv, Arg::Word(1));
                self.place(end);
            }
        }
        self.emit_name(Op::Mm, "evval");
        self.write(dest);
    }

    fn label(&mut self, label: Label) {
        self.place(SmolStr::from(label.to_string()));
    }

    fn jump(&mut self, label: Label) {
        self.emit(Op::Jp, Arg::Name(SmolStr::from(label.to_string())));
    }

    fn jump_if_false(&mut self, condition: &Operand, label: Label) {
        self.load_acc(condition);
        self.emit(Op::Jz, Arg::Name(SmolStr::from(label.to_string())));
    }

    fn pass_parameter(&mut self, value: &Operand, address: usize, size: usize) {
        // The record about to be pushed starts right after the stack pointer.
        match (size, value.offset()) {
            (0, _) => {}
            (1, _) | (_, None) => {
                self.load(value);
                self.emit_name(Op::Ld, "svsptr");
                self.emit_name(Op::Mm, "evaddr");
                self.constant(address as i64 + 1);
                self.emit_name(Op::Mm, "evoffs");
                self.emit_name(Op::Sc, "erwrt");
            }
            (_, Some(source)) => self.block_copy(("svbptr", source), ("svsptr", address + 1), size),
        }
    }

    fn call(&mut self, index: usize, result: Option<(usize, usize)>) {
        self.emit(Op::Sc, Arg::Name(function_label(index)));
        match result {
            None | Some((_, 0)) => {}
            Some((dest, 1)) => {
                self.emit_name(Op::Ld, "svsptr");
                self.emit_name(Op::Mm, "evaddr");
                self.constant(RETURN_SLOT as i64 + 1);
                self.emit_name(Op::Mm, "evoffs");
                self.emit_name(Op::Sc, "errd");
                self.write(dest);
            }
            Some((dest, size)) => {
                self.block_copy(("svsptr", RETURN_SLOT + 1), ("svbptr", dest), size);
            }
        }
    }

    fn function_return(&mut self, value: Option<(&Operand, usize)>) {
        if let Some((operand, size)) = value {
            self.assign(RETURN_SLOT, operand, size);
        }
        let label = self.routine_return_label();
        self.emit(Op::Jp, Arg::Name(label));
    }

    fn scan(&mut self, ty: Type, target: usize) {
        match ty {
            Type::String => self.emit_name(Op::Sc, "scans"),
            Type::Boolean => {
                self.emit_name(Op::Sc, "scani");
                self.emit_name(Op::Ld, "evval");
                self.normalize();
                self.emit_name(Op::Mm, "evval");
            }
            _ => self.emit_name(Op::Sc, "scani"),
        }
        self.write(target);
    }

    fn print(&mut self, value: &Operand) {
        if value.kind == OperandKind::LineBreak {
            return self.print_line_break();
        }
        self.load(value);
        match value.ty {
            Type::String => self.emit_name(Op::Sc, "puts"),
            Type::Boolean => self.emit_name(Op::Sc, "putb"),
            _ => self.emit_name(Op::Sc, "puti"),
        }
    }

    fn print_line_break(&mut self) {
        self.emit_name(Op::Sc, "pbrkl");
    }

    fn intern_string(&mut self, text: &str) -> StrId {
        // Addressed in characters from the start of the buffer.
        let id = StrId(self.strings.len() * 2);
        let bytes = text.as_bytes();
        for pair in bytes.chunks(2) {
            let high = pair[0] as u16;
            let low = pair.get(1).copied().unwrap_or(0) as u16;
            self.strings.push(high << 8 | low);
        }
        self.strings.push(0);
        id
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn lines(mvn: &Mvn) -> Vec<String> {
        mvn.code().iter().map(|i| i.to_string()).collect()
    }

    #[test]
    fn test_instr_columns() {
        let instr = Instr::Line {
            label: Some("main".into()),
            op: Op::Lv,
            arg: Arg::Name("stacks".into()),
        };
        assert_eq!(instr.to_string(), "main    LV  stacks");

        let instr = Instr::Line {
            label: None,
            op: Op::Add,
            arg: Arg::Word(0x2a),
        };
        assert_eq!(instr.to_string(), "        +   /002a");

        let instr = Instr::Line {
            label: Some("evval".into()),
            op: Op::Import,
            arg: Arg::None,
        };
        assert_eq!(instr.to_string(), "evval   <");
    }

    #[test]
    fn test_assign_literal() {
        let mut mvn = Mvn::new();
        mvn.assign(2, &Operand::int(5), 1);
        assert_eq!(
            lines(&mvn),
            vec![
                "        LV  /0005",
                "        MM  evval",
                "        LD  svbptr",
                "        MM  evaddr",
                "        LV  /0002",
                "        MM  evoffs",
                "        SC  erwrt",
            ]
        );
    }

    #[test]
    fn test_large_constants_are_pooled() {
        let mut mvn = Mvn::new();
        mvn.assign(2, &Operand::int(-1), 1);
        mvn.assign(3, &Operand::int(-1), 1);
        mvn.assign(4, &Operand::int(0x1000), 1);

        let code = lines(&mvn);
        assert_eq!(code[0], "        LD  k0000");
        assert_eq!(code[7], "        LD  k0000");
        assert_eq!(code[14], "        LD  k0001");

        let text = mvn.finish().unwrap();
        assert!(text.contains("k0000   K   /ffff"));
        assert!(text.contains("k0001   K   /1000"));
    }

    #[test]
    fn test_labels_attach_to_next_line() {
        let mut mvn = Mvn::new();
        mvn.label(Label(1));
        mvn.label(Label(2));
        mvn.jump(Label(1));

        assert_eq!(
            lines(&mvn),
            vec!["l0001   OS  /0000", "l0002   JP  l0001"]
        );
    }

    #[test]
    fn test_compare_layout() {
        let mut mvn = Mvn::new();
        mvn.compare(Relation::Less, &Operand::int(1), &Operand::int(2), 3);
        let code = lines(&mvn);
        assert_eq!(
            &code[..11],
            &[
                "        LV  /0001",
                "        MM  evtemp",
                "        LV  /0002",
                "        MM  evval",
                "        LD  evtemp",
                "        -   evval",
                "        JN  c0000",
                "        LV  /0000",
                "        JP  c0001",
                "c0000   LV  /0001",
                "c0001   MM  evval",
            ]
        );
    }

    #[test]
    fn test_function_frame() {
        let mut mvn = Mvn::new();
        mvn.begin_function(0, "add", 4);
        mvn.temporary(5);
        mvn.function_return(Some((&Operand::temporary(5, Type::Int), 1)));
        mvn.end_function(0);

        let text = mvn.finish().unwrap();
        assert!(text.contains("; Function: add"));
        assert!(text.contains("f00     K   /0000"));
        assert!(text.contains("        LD  z00"));
        assert!(text.contains("        JP  r00"));
        assert!(text.contains("r00     SC  srrfra"));
        assert!(text.contains("        RS  f00"));
        assert!(text.contains("z00     K   /0006"));
    }

    #[test]
    fn test_program_sections() {
        let mut mvn = Mvn::with_conf(MvnConf {
            header: Some("Crystal compiler".to_string()),
            stack_reserve: 2,
        });
        mvn.begin_main(3);
        let hello = mvn.intern_string("hey");
        let next = mvn.intern_string("a");
        mvn.print(&Operand::string(hello));
        mvn.print(&Operand::line_break());
        mvn.end_main();

        assert_eq!(hello, StrId(0));
        assert_eq!(next, StrId(6));

        let text = mvn.finish().unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], ";");
        assert_eq!(lines[1], ";  Crystal compiler");
        assert!(lines.contains(&"main    >"));
        assert!(lines.contains(&"pbrkl   <"));
        assert!(lines.contains(&"        &   /0000"));
        assert!(lines.contains(&"main    LV  stacks"));
        assert!(lines.contains(&"        SC  puts"));
        assert!(lines.contains(&"        SC  pbrkl"));
        assert!(lines.contains(&"mend    HM  main"));
        assert!(lines.contains(&"strbct  K   /000a"));
        assert!(lines.contains(&"strbs   K   /6865"));
        assert!(lines.contains(&"        K   /7900"));
        assert_eq!(lines.last(), Some(&"        #   main"));

        let stack = lines.iter().position(|l| *l == "stacks  K   /0000").unwrap();
        let end = lines.iter().position(|l| *l == "stacke  K   /0000").unwrap();
        assert_eq!(end - stack, 5);
    }
}
