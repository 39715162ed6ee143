//! Employee report rendering
//!
//! The report is written line by line as the document is walked, so a
//! failure part way through leaves every earlier line in the output.

use std::io::Write;

use tracing::{debug, warn};

use crate::error::ReportError;
use crate::xml::{Document, Element};

pub const ROOT_LABEL: &str = "Name of the Root element:";
pub const SEPARATOR: &str = "*****************************";
pub const ELEMENT_LABEL: &str = "\n Name of the current element :";
pub const ID_LABEL: &str = "Employee ID : ";

pub const EMPLOYEE_TAG: &str = "employee";
pub const ID_ATTRIBUTE: &str = "empid";

/// Child fields printed for every employee, in output order
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Field {
    FirstName,
    LastName,
    NickName,
    Salary,
}

impl Field {
    pub const ALL: [Self; 4] = [Self::FirstName, Self::LastName, Self::NickName, Self::Salary];

    /// Tag name of the child element holding the field
    pub const fn tag(self) -> &'static str {
        match self {
            Self::FirstName => "firstname",
            Self::LastName => "lastname",
            Self::NickName => "nickname",
            Self::Salary => "salary",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::FirstName => "Employee First Name: ",
            Self::LastName => "Employee Last Name: ",
            Self::NickName => "Employee Nick Name: ",
            Self::Salary => "Employee Salary: ",
        }
    }

    /// Text of the first `tag()` descendant of `element`
    pub fn read(self, element: &Element) -> Option<String> {
        element
            .first_element_by_tag_name(self.tag())
            .map(Element::text_content)
    }
}

/// Owned copy of one employee record
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Employee {
    pub empid: String,
    pub first_name: String,
    pub last_name: String,
    pub nick_name: String,
    pub salary: String,
}

impl Employee {
    /// Extract the record from an `employee` element; `index` is only used
    /// for the error.
    pub fn from_element(index: usize, element: &Element) -> Result<Self, ReportError> {
        let empid = element.attribute(ID_ATTRIBUTE).to_string();
        let field = |field: Field| {
            field.read(element).ok_or_else(|| ReportError::MissingField {
                index,
                empid: empid.clone(),
                field: field.tag(),
            })
        };

        Ok(Self {
            first_name: field(Field::FirstName)?,
            last_name: field(Field::LastName)?,
            nick_name: field(Field::NickName)?,
            salary: field(Field::Salary)?,
            empid: empid.clone(),
        })
    }
}

/// Every `employee` record of `doc` in document order.
pub fn employees(doc: &Document) -> Result<Vec<Employee>, ReportError> {
    doc.elements_by_tag_name(EMPLOYEE_TAG)
        .into_iter()
        .enumerate()
        .map(|(index, element)| Employee::from_element(index, element))
        .collect()
}

/// Writes the employee report for a parsed document
#[derive(Debug)]
pub struct ReportPrinter<W> {
    out: W,
}

impl<W: Write> ReportPrinter<W> {
    pub const fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// Print the report, returning the number of employee blocks written.
    pub fn print(&mut self, doc: &Document) -> Result<usize, ReportError> {
        writeln!(self.out, "{ROOT_LABEL}{}", doc.root.name)?;

        let employees = doc.elements_by_tag_name(EMPLOYEE_TAG);
        writeln!(self.out, "{SEPARATOR}")?;
        debug!(count = employees.len(), "found employee elements");

        for (index, employee) in employees.iter().enumerate() {
            self.print_employee(index, employee)?;
        }

        self.out.flush()?;
        Ok(employees.len())
    }

    fn print_employee(&mut self, index: usize, employee: &Element) -> Result<(), ReportError> {
        writeln!(self.out, "{ELEMENT_LABEL}{}", employee.name)?;

        let empid = employee.attribute(ID_ATTRIBUTE);
        if !employee.has_attribute(ID_ATTRIBUTE) {
            warn!(index, "employee has no {ID_ATTRIBUTE} attribute");
        }
        writeln!(self.out, "{ID_LABEL}{empid}")?;

        for field in Field::ALL {
            let Some(value) = field.read(employee) else {
                self.out.flush()?;
                return Err(ReportError::MissingField {
                    index,
                    empid: empid.to_string(),
                    field: field.tag(),
                });
            };
            writeln!(self.out, "{}{value}", field.label())?;
        }

        Ok(())
    }
}
